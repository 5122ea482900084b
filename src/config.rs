// Configuration
// Priority: CLI arguments > environment > defaults

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Pantry API client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// API base URL (including the /api prefix)
    #[arg(
        short = 'u',
        long,
        env = "API_BASE_URL",
        default_value = "http://127.0.0.1:8000/api"
    )]
    pub base_url: String,

    /// Path to the local storage database (tokens, cached profile)
    #[arg(short = 's', long, env = "PANTRY_STORAGE_FILE")]
    pub storage_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "60")]
    pub http_timeout: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Absolute URL prefix every request path is appended to
    pub base_url: String,

    /// Refresh endpoint path, relative to `base_url`
    pub token_refresh_path: String,

    /// Local storage database location
    pub storage_file: PathBuf,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    pub log_level: String,
}

impl Config {
    /// Build configuration from parsed CLI arguments plus the environment
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = Config {
            base_url: args.base_url.trim_end_matches('/').to_string(),

            token_refresh_path: std::env::var("TOKEN_REFRESH_PATH")
                .unwrap_or_else(|_| "/token/refresh/".to_string()),

            storage_file: args
                .storage_file
                .as_deref()
                .map(expand_tilde)
                .unwrap_or_else(default_storage_file),

            http_connect_timeout: std::env::var("HTTP_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            http_request_timeout: args.http_timeout,

            log_level: args.log_level.clone(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("API_BASE_URL must be an http(s) URL: {}", self.base_url);
        }
        Ok(())
    }
}

/// Default storage location under the platform data directory
fn default_storage_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pantry")
        .join("client.db")
}

/// Expand tilde (~) in file paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            token_refresh_path: "/token/refresh/".to_string(),
            storage_file: PathBuf::from("/tmp/pantry.db"),
            http_connect_timeout: 30,
            http_request_timeout: 60,
            log_level: "warn".to_string(),
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/pantry/client.db");
        assert!(path.to_string_lossy().contains("pantry/client.db"));
        assert!(!path.to_string_lossy().starts_with('~'));

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_tilde_just_tilde() {
        // Just "~" without slash should not expand
        let path = expand_tilde("~");
        assert_eq!(path, PathBuf::from("~"));
    }

    #[test]
    fn test_validate_accepts_http_urls() {
        assert!(base_config().validate().is_ok());

        let mut https = base_config();
        https.base_url = "https://pantry.example.com/api".to_string();
        assert!(https.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bare_hosts() {
        let mut config = base_config();
        config.base_url = "pantry.example.com/api".to_string();
        assert!(config.validate().is_err());
    }
}
