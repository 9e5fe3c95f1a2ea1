//! Core data models for bibliographic records and citation relations.

mod paper;
mod relation;

pub use paper::{DoiField, Paper, PaperBuilder, SourceType};
pub use relation::{Direction, RelatedDoiList, DOI_SEPARATOR};
