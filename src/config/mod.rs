//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! environment variables prefixed with `CITATION_RELATIONS_` (nested keys
//! separated by `__`, e.g. `CITATION_RELATIONS_LOOKUPS__MAX_CONCURRENT=8`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [services]
//! opencitations_url = "https://opencitations.net/index/api/v1/metadata"
//! crossref_url = "https://api.crossref.org"
//! mailto = "you@example.org"
//!
//! [lookups]
//! max_concurrent = 4
//! timeout_secs = 30
//! max_retries = 3
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::relations::DEFAULT_MAX_CONCURRENT_LOOKUPS;
use crate::sources::{CROSSREF_API_BASE, OPENCITATIONS_API_BASE};
use crate::utils::DEFAULT_TIMEOUT_SECS;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "CITATION_RELATIONS";

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote service endpoints
    #[serde(default)]
    pub services: ServicesConfig,

    /// Per-DOI lookup behaviour
    #[serde(default)]
    pub lookups: LookupConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Citation index metadata endpoint
    #[serde(default = "default_opencitations_url")]
    pub opencitations_url: String,

    /// CrossRef REST API base
    #[serde(default = "default_crossref_url")]
    pub crossref_url: String,

    /// Contact address for CrossRef's polite pool
    #[serde(default)]
    pub mailto: Option<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            opencitations_url: default_opencitations_url(),
            crossref_url: default_crossref_url(),
            mailto: None,
        }
    }
}

fn default_opencitations_url() -> String {
    OPENCITATIONS_API_BASE.to_string()
}

fn default_crossref_url() -> String {
    CROSSREF_API_BASE.to_string()
}

/// Per-DOI lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Maximum lookups in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per lookup when the metadata source fails transiently
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_LOOKUPS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    3
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "text" or "json"
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    /// Whether log lines should be emitted as JSON
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?
        .try_deserialize()
}

/// Configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(environment())
        .build()?
        .try_deserialize()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Find a configuration file in the usual places
///
/// Checks `./citation-relations.toml`, then
/// `<config dir>/citation-relations/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("citation-relations.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Both loaders read the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.services.opencitations_url, OPENCITATIONS_API_BASE);
        assert_eq!(config.services.crossref_url, CROSSREF_API_BASE);
        assert_eq!(config.lookups.max_concurrent, 4);
        assert_eq!(config.lookups.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_config_file_load() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[services]
opencitations_url = "http://localhost:8080/meta"
mailto = "librarian@example.org"

[lookups]
max_concurrent = 8
max_retries = 1

[logging]
level = "debug"
format = "json"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.services.opencitations_url, "http://localhost:8080/meta");
        assert_eq!(config.services.crossref_url, CROSSREF_API_BASE);
        assert_eq!(
            config.services.mailto.as_deref(),
            Some("librarian@example.org")
        );
        assert_eq!(config.lookups.max_concurrent, 8);
        assert_eq!(config.lookups.max_retries, 1);
        assert_eq!(config.lookups.timeout_secs, 30);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_environment_overrides() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("CITATION_RELATIONS_LOOKUPS__MAX_CONCURRENT", "9");
        std::env::set_var("CITATION_RELATIONS_SERVICES__MAILTO", "env@example.org");

        let config = get_config();

        std::env::remove_var("CITATION_RELATIONS_LOOKUPS__MAX_CONCURRENT");
        std::env::remove_var("CITATION_RELATIONS_SERVICES__MAILTO");

        let config = config.unwrap();
        assert_eq!(config.lookups.max_concurrent, 9);
        assert_eq!(config.services.mailto.as_deref(), Some("env@example.org"));
        assert_eq!(config.lookups.timeout_secs, 30);
        assert_eq!(config.services.opencitations_url, OPENCITATIONS_API_BASE);
    }

    #[test]
    fn test_environment_overrides_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[lookups]\nmax_concurrent = 2\nmax_retries = 5\n").unwrap();
        std::env::set_var("CITATION_RELATIONS_LOOKUPS__MAX_CONCURRENT", "6");

        let config = load_config(&path);

        std::env::remove_var("CITATION_RELATIONS_LOOKUPS__MAX_CONCURRENT");

        let config = config.unwrap();
        assert_eq!(config.lookups.max_concurrent, 6);
        assert_eq!(config.lookups.max_retries, 5);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let mut config = Config::default();
        config.services.mailto = Some("saved@example.org".to_string());
        config.lookups.max_concurrent = 2;

        let text = toml::to_string_pretty(&config).unwrap();
        let loaded: Config = toml::from_str(&text).unwrap();
        assert_eq!(loaded, config);
    }
}
