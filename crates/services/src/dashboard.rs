use std::sync::Arc;

use catalog::{CatalogError, SyllabusRepository};
use course_core::Clock;
use course_core::model::{Assignment, AssignmentCategory, CourseInfo, Week, WeekId};
use course_core::schedule::SemesterCalendar;

use crate::error::DashboardError;

/// One due item on the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    pub week_id: WeekId,
    pub dates: String,
    pub item: String,
}

/// Total weight of all assignments in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryWeight {
    pub category: AssignmentCategory,
    pub weight: u32,
}

/// Everything the landing screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOverview {
    pub course: CourseInfo,
    pub current_week: Week,
    pub upcoming: Vec<Deadline>,
    pub assignments: Vec<Assignment>,
    pub weight_by_category: Vec<CategoryWeight>,
}

/// Read-only views over the syllabus, anchored to the clock's date.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    syllabus: Arc<dyn SyllabusRepository>,
}

impl DashboardService {
    /// How many deadlines the overview lists.
    pub const UPCOMING_LIMIT: usize = 3;

    #[must_use]
    pub fn new(clock: Clock, syllabus: Arc<dyn SyllabusRepository>) -> Self {
        Self { clock, syllabus }
    }

    /// # Errors
    ///
    /// Returns `DashboardError` if the syllabus cannot be read or has no weeks.
    pub async fn overview(&self) -> Result<DashboardOverview, DashboardError> {
        let course = self.syllabus.course_info().await?;
        let schedule = self.syllabus.schedule().await?;
        let current_week = current_week(&course, &schedule, &self.clock)?.clone();
        let upcoming = upcoming_deadlines(&schedule, current_week.id, Self::UPCOMING_LIMIT);
        let assignments = self.syllabus.assignments().await?;
        let weight_by_category = weight_by_category(&assignments);
        Ok(DashboardOverview {
            course,
            current_week,
            upcoming,
            assignments,
            weight_by_category,
        })
    }

    /// The week the clock's date falls in, clamped to the schedule.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::EmptySchedule` when there are no weeks.
    pub async fn current_week(&self) -> Result<Week, DashboardError> {
        let course = self.syllabus.course_info().await?;
        let schedule = self.syllabus.schedule().await?;
        current_week(&course, &schedule, &self.clock).cloned()
    }

    /// # Errors
    ///
    /// Returns `DashboardError` if the syllabus cannot be read.
    pub async fn schedule(&self) -> Result<Vec<Week>, DashboardError> {
        Ok(self.syllabus.schedule().await?)
    }

    /// # Errors
    ///
    /// Returns `DashboardError::UnknownWeek` for a week not on the schedule.
    pub async fn week_detail(&self, id: WeekId) -> Result<Week, DashboardError> {
        match self.syllabus.week(id).await {
            Ok(week) => Ok(week),
            Err(CatalogError::NotFound) => Err(DashboardError::UnknownWeek(id.value())),
            Err(err) => Err(err.into()),
        }
    }
}

fn current_week<'a>(
    course: &CourseInfo,
    schedule: &'a [Week],
    clock: &Clock,
) -> Result<&'a Week, DashboardError> {
    SemesterCalendar::from_course(course)
        .current_week(schedule, clock.today())
        .ok_or(DashboardError::EmptySchedule)
}

/// Due items from `from` onward, in schedule order.
fn upcoming_deadlines(schedule: &[Week], from: WeekId, limit: usize) -> Vec<Deadline> {
    schedule
        .iter()
        .filter(|week| week.id >= from)
        .flat_map(|week| {
            week.due.iter().map(|item| Deadline {
                week_id: week.id,
                dates: week.dates.clone(),
                item: item.clone(),
            })
        })
        .take(limit)
        .collect()
}

fn weight_by_category(assignments: &[Assignment]) -> Vec<CategoryWeight> {
    let mut totals: Vec<CategoryWeight> = Vec::new();
    for assignment in assignments {
        let weight = u32::from(assignment.weight);
        match totals.iter_mut().find(|t| t.category == assignment.category) {
            Some(total) => total.weight += weight,
            None => totals.push(CategoryWeight {
                category: assignment.category,
                weight,
            }),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(id: u32, due: &[&str]) -> Week {
        Week {
            id: WeekId::new(id),
            dates: format!("d{id}"),
            title: format!("Week {id}"),
            topics: Vec::new(),
            readings: Vec::new(),
            due: due.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn upcoming_starts_at_current_week() {
        let schedule = vec![
            week(1, &["Old"]),
            week(2, &[]),
            week(3, &["Quiz 1"]),
            week(4, &["Proposal", "Essay"]),
        ];
        let items: Vec<_> = upcoming_deadlines(&schedule, WeekId::new(2), 2)
            .into_iter()
            .map(|d| d.item)
            .collect();
        assert_eq!(items, ["Quiz 1", "Proposal"]);
    }

    #[test]
    fn category_weights_merge() {
        let assignment = |id: &str, weight, category| Assignment {
            id: id.into(),
            name: id.into(),
            weight,
            category,
            due_date: None,
        };
        let totals = weight_by_category(&[
            assignment("att", 10, AssignmentCategory::Participation),
            assignment("quiz", 25, AssignmentCategory::Quiz),
            assignment("part", 10, AssignmentCategory::Participation),
        ]);
        assert_eq!(
            totals,
            vec![
                CategoryWeight {
                    category: AssignmentCategory::Participation,
                    weight: 20
                },
                CategoryWeight {
                    category: AssignmentCategory::Quiz,
                    weight: 25
                },
            ]
        );
    }
}
