use crate::model::ids::WeekId;
use crate::model::question::Question;

/// A presenter-driven, timed quiz tied to a schedule week.
///
/// Every question carries a time limit; the catalog rejects live questions
/// without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveQuiz {
    pub week_id: WeekId,
    pub title: String,
    pub questions: Vec<Question>,
    pub is_locked: bool,
}

impl LiveQuiz {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
