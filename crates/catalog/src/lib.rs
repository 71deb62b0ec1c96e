#![forbid(unsafe_code)]

pub mod records;
pub mod repository;

pub use records::CourseContent;
pub use repository::{
    Catalog, CatalogError, InMemoryCatalog, QuizBankRepository, SyllabusRepository,
};
