//! Citation relation resolution.
//!
//! A lookup runs in two stages:
//!
//! 1. [`OpenCitationsClient::fetch_relation_list`] asks the citation index for
//!    the DOIs related to the seed work, in one request;
//! 2. [`RelationExpander::expand`] resolves each of those DOIs into a
//!    [`Paper`] through a [`DoiFetcher`], reporting progress as it goes.
//!
//! Failures of the first stage are terminal and surface as [`RelationError`].
//! Failures of individual lookups in the second stage are dropped from the
//! result and listed in [`Expansion::failures`].
//!
//! ```rust,no_run
//! use citation_relations::models::Direction;
//! use citation_relations::relations::RelationResolver;
//! use citation_relations::utils::RelationProgress;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = RelationResolver::with_defaults()?;
//! let progress = RelationProgress::new();
//! let papers = resolver
//!     .resolve_relations("10.1145/3368089.3409742", Direction::CitedBy, &progress)
//!     .await?;
//! println!("{} citing works", papers.len());
//! # Ok(())
//! # }
//! ```

pub mod expander;

pub use expander::{Expansion, LookupFailure, RelationExpander, DEFAULT_MAX_CONCURRENT_LOOKUPS};

use std::sync::Arc;

use crate::config::Config;
use crate::models::{Direction, DoiField, Paper};
use crate::sources::{CrossRefSource, DoiFetcher, OpenCitationsClient, SourceError};
use crate::utils::{lookup_retry_config, HttpClient, RelationProgress};

/// Terminal failures of a relation lookup
#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    /// No network path to the citation index
    #[error("No internet connection! Please check your connection and try again. ({0})")]
    Connectivity(String),

    /// The citation index answered badly or the request failed otherwise
    #[error("Couldn't connect to opencitations.net! Please try again. ({0})")]
    Service(String),

    /// The HTTP client could not be set up
    #[error("Failed to set up HTTP client: {0}")]
    Client(#[from] SourceError),
}

impl RelationError {
    /// Whether the user should check their network connection
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RelationError::Connectivity(_))
    }
}

/// Resolves the records citing, or cited by, a bibliographic record
///
/// The resolver holds no per-call state: direction and progress are passed
/// to every call, so one instance can serve concurrent lookups.
#[derive(Debug, Clone)]
pub struct RelationResolver {
    index: OpenCitationsClient,
    fetcher: Arc<dyn DoiFetcher>,
    expander: RelationExpander,
}

impl RelationResolver {
    /// Combine a citation index client with a metadata source
    pub fn new(index: OpenCitationsClient, fetcher: Arc<dyn DoiFetcher>) -> Self {
        Self {
            index,
            fetcher,
            expander: RelationExpander::default(),
        }
    }

    /// Production services with default settings
    pub fn with_defaults() -> Result<Self, RelationError> {
        Self::from_config(&Config::default())
    }

    /// Build the services described by the configuration
    pub fn from_config(config: &Config) -> Result<Self, RelationError> {
        let client = Arc::new(HttpClient::with_timeout(
            &crate::utils::get_user_agent(),
            config.lookups.timeout_secs,
        )?);

        let index = OpenCitationsClient::with_client(
            Arc::clone(&client),
            config.services.opencitations_url.as_str(),
        );
        let crossref = CrossRefSource::with_client(client, config.services.crossref_url.as_str())
            .mailto(config.services.mailto.clone())
            .retry(lookup_retry_config(config.lookups.max_retries));

        Ok(Self::new(index, Arc::new(crossref))
            .with_expander(RelationExpander::new(config.lookups.max_concurrent)))
    }

    /// Replace the expansion policy
    pub fn with_expander(mut self, expander: RelationExpander) -> Self {
        self.expander = expander;
        self
    }

    /// The metadata source used for per-DOI lookups
    pub fn fetcher(&self) -> &Arc<dyn DoiFetcher> {
        &self.fetcher
    }

    /// Resolve the related records of `entry`
    ///
    /// An entry without a DOI is looked up as the empty string, which the
    /// index normally answers with no data.
    pub async fn resolve_relations<E>(
        &self,
        entry: &E,
        direction: Direction,
        progress: &RelationProgress,
    ) -> Result<Vec<Paper>, RelationError>
    where
        E: DoiField + ?Sized,
    {
        Ok(self
            .resolve_relations_detailed(entry, direction, progress)
            .await?
            .papers)
    }

    /// Like [`resolve_relations`](Self::resolve_relations), keeping failed lookups
    pub async fn resolve_relations_detailed<E>(
        &self,
        entry: &E,
        direction: Direction,
        progress: &RelationProgress,
    ) -> Result<Expansion, RelationError>
    where
        E: DoiField + ?Sized,
    {
        let seed_doi = entry.doi().unwrap_or_default();

        let related = self.index.fetch_relation_list(seed_doi, direction).await?;
        tracing::debug!(
            "Resolving {} related DOIs of {:?} via {}",
            related.len(),
            seed_doi,
            self.fetcher.name()
        );

        let expansion = self
            .expander
            .expand(seed_doi, related, self.fetcher.as_ref(), progress)
            .await;

        tracing::info!(
            "{} {}: {} records, {} failed lookups",
            seed_doi,
            direction,
            expansion.papers.len(),
            expansion.failures.len()
        );
        Ok(expansion)
    }
}
