//! Remote services used to resolve citation relations.
//!
//! Two kinds of service take part in a lookup:
//!
//! - the citation index ([`OpenCitationsClient`]) that lists the DOIs related
//!   to a seed work, and
//! - a metadata source implementing [`DoiFetcher`] that turns one DOI into a
//!   full [`Paper`]. [`CrossRefSource`] is the production implementation,
//!   [`MockDoiFetcher`] a scripted one for tests.
//!
//! New metadata sources can be plugged in by implementing [`DoiFetcher`] and
//! handing them to [`RelationResolver::new`](crate::relations::RelationResolver::new).

mod crossref;
pub mod mock;
mod opencitations;

pub use crossref::{CrossRefSource, CROSSREF_API_BASE};
pub use mock::{make_paper, MockDoiFetcher};
pub use opencitations::{OpenCitationsClient, OPENCITATIONS_API_BASE};

use crate::models::Paper;
use async_trait::async_trait;

/// A metadata source that resolves a single DOI into a bibliographic record
#[async_trait]
pub trait DoiFetcher: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "crossref")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Look up one DOI
    ///
    /// `Ok(None)` means the source answered but knows no record for the DOI.
    async fn fetch_by_doi(&self, doi: &str) -> Result<Option<Paper>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Paper not found
    #[error("Paper not found: {0}")]
    NotFound(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
