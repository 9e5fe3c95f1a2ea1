//! # Citation Relations
//!
//! Resolve the citation neighbourhood of a bibliographic record: the works a
//! DOI cites, or the works citing it, as full records.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Paper, Direction, RelatedDoiList)
//! - [`sources`]: The OpenCitations index client and DOI metadata sources
//! - [`relations`]: The two-stage resolution pipeline and its errors
//! - [`ui`]: Terminal output for the command-line tool
//! - [`utils`]: HTTP client, progress tracking and retry utilities
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod relations;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Direction, DoiField, Paper};
pub use relations::{Expansion, RelationError, RelationResolver};
pub use sources::DoiFetcher;
pub use utils::RelationProgress;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
