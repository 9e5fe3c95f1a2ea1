//! CrossRef metadata source.
//!
//! Resolves a single DOI through `GET /works/{doi}` on the CrossRef REST API.
//! When a contact address is configured it is sent as `mailto` so requests
//! land in CrossRef's polite pool.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Paper, PaperBuilder, SourceType};
use crate::sources::{DoiFetcher, SourceError};
use crate::utils::{lookup_retry_config, with_retry, HttpClient, RetryConfig};

/// Default CrossRef API base URL
pub const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// CrossRef DOI metadata source
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    client: Arc<HttpClient>,
    base_url: String,
    mailto: Option<String>,
    retry: RetryConfig,
}

impl CrossRefSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(
            Arc::new(HttpClient::new()?),
            CROSSREF_API_BASE,
        ))
    }

    /// Create a source talking to `base_url` through an existing client
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mailto: None,
            retry: lookup_retry_config(3),
        }
    }

    /// Create a source with a custom base URL (for testing against a mock server)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?), base_url))
    }

    /// Identify ourselves to CrossRef's polite pool
    pub fn mailto(mut self, mailto: Option<String>) -> Self {
        self.mailto = mailto.filter(|m| !m.trim().is_empty());
        self
    }

    /// Override the retry policy for transient failures
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn works_url(&self, doi: &str) -> String {
        match &self.mailto {
            Some(mailto) => format!(
                "{}/works/{}?mailto={}",
                self.base_url,
                doi,
                urlencoding::encode(mailto)
            ),
            None => format!("{}/works/{}", self.base_url, doi),
        }
    }

    fn parse_work(work: CRWork) -> Paper {
        let doi = work.doi.unwrap_or_default();
        let title = work.title.into_iter().next().unwrap_or_default();

        let authors = work
            .author
            .iter()
            .filter_map(CRAuthor::display_name)
            .collect::<Vec<_>>()
            .join("; ");

        let url = work
            .url
            .unwrap_or_else(|| format!("https://doi.org/{}", doi));

        let mut builder = PaperBuilder::new(doi.clone(), title, url, SourceType::CrossRef)
            .authors(authors)
            .doi(doi);

        let published = work
            .published
            .or(work.published_print)
            .or(work.published_online)
            .and_then(|d| d.to_iso());
        if let Some(date) = published {
            builder = builder.published_date(date);
        }
        if let Some(venue) = work.container_title.into_iter().next() {
            builder = builder.venue(venue);
        }
        if let Some(abstract_text) = work.abstract_text {
            builder = builder.abstract_text(abstract_text);
        }
        if let Some(count) = work.is_referenced_by_count {
            builder = builder.citations(count);
        }

        builder.build()
    }
}

#[async_trait]
impl DoiFetcher for CrossRefSource {
    fn id(&self) -> &str {
        "crossref"
    }

    fn name(&self) -> &str {
        "CrossRef"
    }

    async fn fetch_by_doi(&self, doi: &str) -> Result<Option<Paper>, SourceError> {
        let doi = doi.trim();
        if doi.is_empty() {
            return Err(SourceError::InvalidRequest("empty DOI".to_string()));
        }

        let url = self.works_url(doi);
        tracing::debug!("CrossRef lookup: {}", url);

        let client = Arc::clone(&self.client);
        let url_for_retry = url.clone();

        let data = with_retry(self.retry, || {
            let client = Arc::clone(&client);
            let url = url_for_retry.clone();
            async move {
                let response = client.get(&url).send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to fetch DOI from CrossRef: {}", e))
                })?;

                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(SourceError::RateLimit);
                }
                if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                    return Err(SourceError::Api(
                        "CrossRef service unavailable (503)".to_string(),
                    ));
                }
                if !status.is_success() {
                    return Err(SourceError::Api(format!(
                        "CrossRef API returned status: {}",
                        status
                    )));
                }

                let data: CRResponse = response
                    .json()
                    .await
                    .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

                Ok(Some(data))
            }
        })
        .await?;

        Ok(data.map(|d| Self::parse_work(d.message)))
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRResponse {
    message: CRWork,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CRWork {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CRAuthor>,
    #[serde(default)]
    container_title: Vec<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    published: Option<CRDate>,
    published_print: Option<CRDate>,
    published_online: Option<CRDate>,
    is_referenced_by_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CRAuthor {
    given: Option<String>,
    family: Option<String>,
    name: Option<String>,
}

impl CRAuthor {
    fn display_name(&self) -> Option<String> {
        match (&self.given, &self.family, &self.name) {
            (Some(given), Some(family), _) => Some(format!("{} {}", given, family)),
            (None, Some(family), _) => Some(family.clone()),
            (_, None, Some(name)) => Some(name.clone()),
            (Some(given), None, None) => Some(given.clone()),
            (None, None, None) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CRDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl CRDate {
    fn to_iso(&self) -> Option<String> {
        let parts: Vec<i32> = self
            .date_parts
            .first()?
            .iter()
            .map_while(|p| *p)
            .collect();

        match parts.as_slice() {
            [] => None,
            [year] => Some(format!("{:04}", year)),
            [year, month] => Some(format!("{:04}-{:02}", year, month)),
            [year, month, day, ..] => Some(format!("{:04}-{:02}-{:02}", year, month, day)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_BODY: &str = r#"{
        "status": "ok",
        "message": {
            "DOI": "10.1/A",
            "URL": "https://doi.org/10.1/A",
            "title": ["Alpha"],
            "author": [
                {"given": "Ada", "family": "Lovelace"},
                {"name": "The Consortium"}
            ],
            "container-title": ["Journal of Tests"],
            "published": {"date-parts": [[2020, 3, 7]]},
            "is-referenced-by-count": 12
        }
    }"#;

    #[test]
    fn test_source_creation() {
        let source = CrossRefSource::new();
        assert!(source.is_ok());
    }

    #[test]
    fn test_works_url() {
        let source = CrossRefSource::with_base_url("https://api.crossref.org/")
            .unwrap()
            .mailto(Some("me@example.org".to_string()));
        assert_eq!(
            source.works_url("10.1/A"),
            "https://api.crossref.org/works/10.1/A?mailto=me%40example.org"
        );

        let anonymous = CrossRefSource::with_base_url("https://api.crossref.org")
            .unwrap()
            .mailto(Some("  ".to_string()));
        assert_eq!(
            anonymous.works_url("10.1/A"),
            "https://api.crossref.org/works/10.1/A"
        );
    }

    #[test]
    fn test_parse_work() {
        let data: CRResponse = serde_json::from_str(WORK_BODY).unwrap();
        let paper = CrossRefSource::parse_work(data.message);

        assert_eq!(paper.title, "Alpha");
        assert_eq!(paper.doi.as_deref(), Some("10.1/A"));
        assert_eq!(paper.authors, "Ada Lovelace; The Consortium");
        assert_eq!(paper.venue.as_deref(), Some("Journal of Tests"));
        assert_eq!(paper.published_date.as_deref(), Some("2020-03-07"));
        assert_eq!(paper.citations, Some(12));
        assert_eq!(paper.source, SourceType::CrossRef);
    }

    #[test]
    fn test_partial_dates() {
        let year_only = CRDate {
            date_parts: vec![vec![Some(1999)]],
        };
        assert_eq!(year_only.to_iso().as_deref(), Some("1999"));

        let gap = CRDate {
            date_parts: vec![vec![Some(2001), None, Some(4)]],
        };
        assert_eq!(gap.to_iso().as_deref(), Some("2001"));

        let empty = CRDate { date_parts: vec![] };
        assert!(empty.to_iso().is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_doi() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/works/10.1/A")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(WORK_BODY)
            .create_async()
            .await;

        let source = CrossRefSource::with_base_url(server.url()).unwrap();
        let paper = source.fetch_by_doi("10.1/A").await.unwrap().unwrap();

        assert_eq!(paper.title, "Alpha");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_unknown_doi_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/works/10.1/missing")
            .with_status(404)
            .with_body("Resource not found.")
            .create_async()
            .await;

        let source = CrossRefSource::with_base_url(server.url()).unwrap();
        assert!(source.fetch_by_doi("10.1/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/works/10.1/bad")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let source = CrossRefSource::with_base_url(server.url()).unwrap();
        let result = source.fetch_by_doi("10.1/bad").await;
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/works/10.1/err")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let source = CrossRefSource::with_base_url(server.url()).unwrap();
        let result = source.fetch_by_doi("10.1/err").await;
        assert!(matches!(result, Err(SourceError::Api(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_doi_is_rejected() {
        let source = CrossRefSource::with_base_url("http://127.0.0.1:9").unwrap();
        let result = source.fetch_by_doi("  ").await;
        assert!(matches!(result, Err(SourceError::InvalidRequest(_))));
    }
}
