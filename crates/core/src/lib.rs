#![forbid(unsafe_code)]

pub mod error;
pub mod flashcards;
pub mod live;
pub mod model;
pub mod schedule;
pub mod session;
pub mod time;
pub mod unlock;

pub use error::PreconditionError;
pub use time::Clock;
