//! OpenCitations citation index client.
//!
//! The v1 metadata endpoint answers `GET {base}/{doi}` with a JSON array. Its
//! first element carries the related DOIs of the work as `"; "`-delimited
//! strings: `reference` for the works it cites, `citation` for the works
//! citing it.

use std::sync::Arc;

use crate::models::{Direction, RelatedDoiList};
use crate::relations::RelationError;
use crate::utils::HttpClient;

/// Default OpenCitations metadata endpoint
pub const OPENCITATIONS_API_BASE: &str = "https://opencitations.net/index/api/v1/metadata";

/// Client for the citation index
#[derive(Debug, Clone)]
pub struct OpenCitationsClient {
    client: Arc<HttpClient>,
    base_url: String,
}

impl OpenCitationsClient {
    pub fn new() -> Result<Self, RelationError> {
        Self::with_base_url(OPENCITATIONS_API_BASE)
    }

    /// Create a client with a custom base URL (for testing against a mock server)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RelationError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?), base_url))
    }

    /// Create a client talking to `base_url` through an existing client
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Query URL for a seed DOI; the DOI is appended verbatim
    pub fn query_url(&self, seed_doi: &str) -> String {
        format!("{}/{}", self.base_url, seed_doi)
    }

    /// Fetch the DOIs related to `seed_doi` in the given direction
    ///
    /// An empty answer from the index is a valid empty list, not an error.
    pub async fn fetch_relation_list(
        &self,
        seed_doi: &str,
        direction: Direction,
    ) -> Result<RelatedDoiList, RelationError> {
        let url = self.query_url(seed_doi);
        tracing::debug!("Citation index query ({}): {}", direction, url);

        let response = self.client.get(&url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelationError::Service(format!(
                "OpenCitations returned status {}",
                status
            )));
        }

        let body = response.text().await.map_err(classify)?;
        parse_relation_list(&body, direction)
    }
}

/// Extract the related DOI list from a raw index response body
pub fn parse_relation_list(
    body: &str,
    direction: Direction,
) -> Result<RelatedDoiList, RelationError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| RelationError::Service(format!("invalid JSON from OpenCitations: {}", e)))?;

    let Some(first) = entries.first() else {
        tracing::debug!("No citation data available");
        return Ok(RelatedDoiList::default());
    };

    let field = first.get(direction.label()).and_then(serde_json::Value::as_str);
    let list = RelatedDoiList::parse(field);
    tracing::debug!("{} related DOIs ({})", list.len(), direction);
    Ok(list)
}

/// Split transport failures into "no route to the service" and everything else
fn classify(err: reqwest::Error) -> RelationError {
    if err.is_connect() {
        RelationError::Connectivity(err.to_string())
    } else {
        RelationError::Service(err.to_string())
    }
}
