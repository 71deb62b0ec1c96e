use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::WeekId;

/// Course-wide facts shown on the dashboard and fed to the tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub code: String,
    pub title: String,
    pub instructor: String,
    pub semester: String,
    pub textbook: String,
    pub semester_start: NaiveDate,
    pub semester_end: NaiveDate,
}

/// One row of the course schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub id: WeekId,
    pub dates: String,
    pub title: String,
    pub topics: Vec<String>,
    pub readings: Vec<String>,
    #[serde(default)]
    pub due: Vec<String>,
}

impl Week {
    #[must_use]
    pub fn has_deadlines(&self) -> bool {
        !self.due.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentCategory {
    Participation,
    Quiz,
    Essay,
    Exam,
    Project,
    Presentation,
}

impl fmt::Display for AssignmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssignmentCategory::Participation => "Participation",
            AssignmentCategory::Quiz => "Quiz",
            AssignmentCategory::Essay => "Essay",
            AssignmentCategory::Exam => "Exam",
            AssignmentCategory::Project => "Project",
            AssignmentCategory::Presentation => "Presentation",
        };
        f.write_str(label)
    }
}

/// A graded component; weights across the course sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub name: String,
    pub weight: u8,
    pub category: AssignmentCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DimensionCategory {
    /// Joint-power dimension.
    ExecutivesParties,
    /// Divided-power dimension.
    FederalUnitary,
}

impl DimensionCategory {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DimensionCategory::ExecutivesParties => "Dimension I: Executives-Parties",
            DimensionCategory::FederalUnitary => "Dimension II: Federal-Unitary",
        }
    }
}

/// An institutional variable contrasted between the Westminster and Consensus models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub name: String,
    pub category: DimensionCategory,
    pub chapter: u32,
    pub westminster: String,
    pub consensus: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlashcardCategory {
    Concept,
    Dimension,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    pub category: FlashcardCategory,
}

impl Flashcard {
    /// Turn a dimension into a card: name on the front, both models on the back.
    #[must_use]
    pub fn from_dimension(dimension: &Dimension) -> Self {
        Self {
            id: dimension.id.clone(),
            front: dimension.name.clone(),
            back: format!(
                "Westminster: {}\n\nConsensus: {}",
                dimension.westminster, dimension.consensus
            ),
            category: FlashcardCategory::Dimension,
        }
    }
}
