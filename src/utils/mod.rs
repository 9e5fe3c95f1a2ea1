//! Utility modules supporting relation resolution.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and a user agent
//! - [`RelationProgress`]: thread-safe fractional progress handle
//! - [`RetryConfig`] / [`with_retry`]: retry with exponential backoff on transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use citation_relations::sources::SourceError;
//! use citation_relations::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let data = with_retry(config, fetch_data).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod progress;
mod retry;

pub use http::{get_user_agent, HttpClient, DEFAULT_TIMEOUT_SECS, USER_AGENT_ENV};
pub use progress::RelationProgress;
pub use retry::{lookup_retry_config, with_retry, RetryConfig, TransientError};
