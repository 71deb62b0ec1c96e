mod course;
mod ids;
mod level;
mod live_quiz;
mod question;

pub use course::{
    Assignment, AssignmentCategory, CourseInfo, Dimension, DimensionCategory, Flashcard,
    FlashcardCategory, Week,
};
pub use ids::{LevelNumber, OptionId, ParseIdError, QuestionId, WeekId};
pub use level::{Level, LevelError};
pub use live_quiz::LiveQuiz;
pub use question::{AnswerOption, OptionColor, Question, QuestionError};
