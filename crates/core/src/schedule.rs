use chrono::NaiveDate;

use crate::model::{CourseInfo, Week};

/// First and last day of instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterCalendar {
    start: NaiveDate,
    end: NaiveDate,
}

impl SemesterCalendar {
    /// Builds a calendar; the bounds are swapped if given in reverse.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    #[must_use]
    pub fn from_course(course: &CourseInfo) -> Self {
        Self::new(course.semester_start, course.semester_end)
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Zero-based week index for `today`, clamped to the schedule.
    ///
    /// Before the semester this is the first week; after it, the last.
    #[must_use]
    pub fn week_index(&self, today: NaiveDate, week_count: usize) -> Option<usize> {
        let last = week_count.checked_sub(1)?;
        if today < self.start {
            return Some(0);
        }
        if today > self.end {
            return Some(last);
        }
        let days = (today - self.start).num_days();
        let index = usize::try_from(days / 7).unwrap_or(usize::MAX);
        Some(index.min(last))
    }

    /// The schedule row that is current on `today`.
    #[must_use]
    pub fn current_week<'a>(&self, weeks: &'a [Week], today: NaiveDate) -> Option<&'a Week> {
        self.week_index(today, weeks.len()).and_then(|i| weeks.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeekId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weeks(n: u32) -> Vec<Week> {
        (1..=n)
            .map(|id| Week {
                id: WeekId::new(id),
                dates: String::new(),
                title: format!("Week {id}"),
                topics: Vec::new(),
                readings: Vec::new(),
                due: Vec::new(),
            })
            .collect()
    }

    fn calendar() -> SemesterCalendar {
        SemesterCalendar::new(date(2026, 1, 27), date(2026, 5, 15))
    }

    #[test]
    fn before_start_is_first_week() {
        let w = weeks(16);
        let current = calendar().current_week(&w, date(2025, 12, 1)).unwrap();
        assert_eq!(current.id, WeekId::new(1));
    }

    #[test]
    fn after_end_is_last_week() {
        let w = weeks(16);
        let current = calendar().current_week(&w, date(2026, 6, 1)).unwrap();
        assert_eq!(current.id, WeekId::new(16));
    }

    #[test]
    fn inside_semester_counts_whole_weeks() {
        let w = weeks(16);
        let cal = calendar();
        assert_eq!(cal.current_week(&w, date(2026, 1, 27)).unwrap().id, WeekId::new(1));
        assert_eq!(cal.current_week(&w, date(2026, 2, 2)).unwrap().id, WeekId::new(1));
        assert_eq!(cal.current_week(&w, date(2026, 2, 3)).unwrap().id, WeekId::new(2));
    }

    #[test]
    fn short_schedule_clamps_to_last_row() {
        let w = weeks(3);
        let current = calendar().current_week(&w, date(2026, 4, 1)).unwrap();
        assert_eq!(current.id, WeekId::new(3));
    }

    #[test]
    fn empty_schedule_has_no_current_week() {
        assert!(calendar().current_week(&[], date(2026, 2, 1)).is_none());
    }
}
