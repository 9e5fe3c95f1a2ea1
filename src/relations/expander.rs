//! Expansion of a related-DOI list into bibliographic records.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use crate::models::{Paper, RelatedDoiList};
use crate::sources::DoiFetcher;
use crate::utils::RelationProgress;

/// Default number of DOI lookups in flight at once
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;

/// A related DOI whose lookup failed and was left out of the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupFailure {
    pub doi: String,
    pub reason: String,
}

/// Outcome of expanding one related-DOI list
///
/// Expansion is best effort: a DOI whose lookup fails is dropped from
/// `papers` and reported in `failures`, it never aborts the whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Expansion {
    /// Resolved records, in the order their DOIs appeared
    pub papers: Vec<Paper>,

    /// Lookups that failed
    pub failures: Vec<LookupFailure>,

    /// Number of DOIs handed to the fetcher
    pub attempted: usize,

    /// Entries skipped without a lookup (the seed itself or empty strings)
    pub skipped: usize,
}

/// Turns related DOIs into records through a [`DoiFetcher`]
#[derive(Debug, Clone, Copy)]
pub struct RelationExpander {
    max_concurrent: usize,
}

impl Default for RelationExpander {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_LOOKUPS)
    }
}

impl RelationExpander {
    /// Create an expander running at most `max_concurrent` lookups at once
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// One lookup at a time, in list order
    pub fn sequential() -> Self {
        Self::new(1)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Resolve every related DOI except the seed and empty entries
    ///
    /// Lookups overlap up to the concurrency limit, but results are consumed
    /// in list order: after the i-th of n entries `progress` reads `i / n`,
    /// whether that entry resolved, failed or was skipped. An empty list leaves
    /// `progress` untouched.
    pub async fn expand(
        &self,
        seed_doi: &str,
        related: RelatedDoiList,
        fetcher: &dyn DoiFetcher,
        progress: &RelationProgress,
    ) -> Expansion {
        let total = related.len();
        let mut expansion = Expansion::default();

        let lookups = related.into_iter().map(move |doi| async move {
            if doi.is_empty() || doi == seed_doi {
                return (doi, None);
            }
            let outcome = fetcher.fetch_by_doi(&doi).await;
            (doi, Some(outcome))
        });
        let mut results = stream::iter(lookups).buffered(self.max_concurrent);

        let mut position = 0;
        while let Some((doi, outcome)) = results.next().await {
            position += 1;
            tracing::debug!("Current item {}/{}", position, total);

            match outcome {
                None => expansion.skipped += 1,
                Some(Ok(Some(paper))) => {
                    expansion.attempted += 1;
                    expansion.papers.push(paper);
                }
                Some(Ok(None)) => {
                    expansion.attempted += 1;
                    tracing::debug!("No record for {} at {}", doi, fetcher.name());
                }
                Some(Err(err)) => {
                    expansion.attempted += 1;
                    tracing::debug!("Dropping {}: {}", doi, err);
                    expansion.failures.push(LookupFailure {
                        doi,
                        reason: err.to_string(),
                    });
                }
            }

            progress.update(position, total);
        }

        expansion
    }
}
