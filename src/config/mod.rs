//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::DEFAULT_MAX_RESULTS;
use crate::sources::ARXIV_API_URL;

/// Environment variable holding the listening port
pub const PORT_ENV: &str = "PORT";

/// Prefix for environment overrides of file configuration
pub const ENV_PREFIX: &str = "ARXIV_RESEARCHER";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Network settings for the MCP server
    #[serde(default)]
    pub server: ServerConfig,

    /// arXiv API settings
    #[serde(default)]
    pub arxiv: ArxivConfig,
}

impl Config {
    /// Check values that serde accepts but the server cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        url::Url::parse(&self.arxiv.api_url).map_err(|e| {
            config::ConfigError::Message(format!(
                "invalid arxiv.api_url '{}': {}",
                self.arxiv.api_url, e
            ))
        })?;

        if self.arxiv.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "arxiv.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.arxiv.default_max_results == 0 {
            return Err(config::ConfigError::Message(
                "arxiv.default_max_results must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Server bind settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (all interfaces by default)
    #[serde(default = "default_host")]
    pub host: String,

    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Apply the `PORT` environment variable, if set.
    pub fn with_env_port(mut self) -> Result<Self, config::ConfigError> {
        if let Ok(raw) = std::env::var(PORT_ENV) {
            self.port = parse_port(&raw)?;
        }
        Ok(self)
    }

    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Parse a port value taken from the environment
pub fn parse_port(raw: &str) -> Result<u16, config::ConfigError> {
    raw.trim().parse::<u16>().map_err(|e| {
        config::ConfigError::Message(format!("invalid {} value '{}': {}", PORT_ENV, raw, e))
    })
}

/// arXiv API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Query endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Result count used when the caller gives none
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            default_max_results: default_max_results(),
        }
    }
}

impl ArxivConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_url() -> String {
    ARXIV_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Load configuration from a file, with `ARXIV_RESEARCHER_*` environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.arxiv.api_url, "https://export.arxiv.org/api/query");
        assert_eq!(config.arxiv.timeout(), Duration::from_secs(15));
        assert_eq!(config.arxiv.default_max_results, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(server.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port(" 10000\n").unwrap(), 10000);
        assert!(parse_port("eighty").is_err());
        assert!(parse_port("70000").is_err());
        assert!(parse_port("").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.arxiv.api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.arxiv.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.arxiv.default_max_results = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[arxiv]\napi_url = \"http://localhost:1234/api/query\"\ntimeout_secs = 3"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.arxiv.api_url, "http://localhost:1234/api/query");
        assert_eq!(config.arxiv.timeout_secs, 3);
        assert_eq!(config.arxiv.default_max_results, 5);
    }

    #[test]
    fn test_load_config_rejects_invalid_url() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[arxiv]\napi_url = \"::nope::\"").unwrap();

        assert!(load_config(file.path()).is_err());
    }
}
