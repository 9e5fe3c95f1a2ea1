//! Mock metadata source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::models::{Paper, PaperBuilder, SourceType};
use crate::sources::{DoiFetcher, SourceError};

#[derive(Debug, Clone)]
enum Scripted {
    Found(Paper),
    Missing,
    Fail(String),
}

/// A DOI fetcher that returns scripted outcomes and records every lookup.
///
/// DOIs without a scripted outcome resolve to a generated paper.
#[derive(Debug, Default)]
pub struct MockDoiFetcher {
    outcomes: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl MockDoiFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return this paper for `doi`.
    pub fn with_paper(self, doi: &str, paper: Paper) -> Self {
        self.script(doi, Scripted::Found(paper));
        self
    }

    /// Answer "no record" for `doi`.
    pub fn with_missing(self, doi: &str) -> Self {
        self.script(doi, Scripted::Missing);
        self
    }

    /// Fail the lookup for `doi` with an API error.
    pub fn with_failure(self, doi: &str, reason: &str) -> Self {
        self.script(doi, Scripted::Fail(reason.to_string()));
        self
    }

    /// DOIs looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn script(&self, doi: &str, outcome: Scripted) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(doi.to_string(), outcome);
    }
}

#[async_trait]
impl DoiFetcher for MockDoiFetcher {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch_by_doi(&self, doi: &str) -> Result<Option<Paper>, SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(doi.to_string());

        let scripted = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(doi)
            .cloned();

        match scripted {
            Some(Scripted::Found(paper)) => Ok(Some(paper)),
            Some(Scripted::Missing) => Ok(None),
            Some(Scripted::Fail(reason)) => Err(SourceError::Api(reason)),
            None => Ok(Some(make_paper(doi, &format!("Paper {}", doi)))),
        }
    }
}

/// Helper function to create a mock paper for testing.
pub fn make_paper(doi: &str, title: &str) -> Paper {
    PaperBuilder::new(
        doi,
        title,
        format!("https://doi.org/{}", doi),
        SourceType::Other("mock".to_string()),
    )
    .doi(doi)
    .build()
}
