//! Service configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts. A `.env` file in the working directory is honored (loaded by
//! `main.rs` through `dotenvy`).
//!
//! ## Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log filter (default: `info`)
//! - `LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `UPSTREAM_UPDATES_URL` - Listing page (default: `https://manganato.com/genre-all`)
//! - `UPSTREAM_SOURCES` - Prefix table as `prefix=url,prefix=url`
//!   (default: `cu=https://chapmanganato.to,mu=https://manganato.com`)
//! - `UPSTREAM_TIMEOUT_SECS` - Per-fetch timeout (default: 10)
//! - `UPSTREAM_REQUESTS_PER_SECOND` - Outbound rate, 0 disables (default: 4.0)
//! - `UPSTREAM_MAX_RETRIES` - Retries for 429/5xx answers (default: 2)

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

use manganato_core::client::ClientConfig;
use manganato_core::resolver::DEFAULT_SOURCES;
use manganato_core::scraper::DEFAULT_UPDATES_URL;
use manganato_core::{SiteConfig, SourceResolver};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub updates_url: String,
    /// `(prefix, base_url)` pairs for title pages.
    pub sources: Vec<(String, String)>,
    pub upstream_timeout_secs: u64,
    pub upstream_requests_per_second: f64,
    pub upstream_max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            updates_url: DEFAULT_UPDATES_URL.to_string(),
            sources: DEFAULT_SOURCES
                .iter()
                .map(|(p, b)| (p.to_string(), b.to_string()))
                .collect(),
            upstream_timeout_secs: ClientConfig::default().timeout_secs,
            upstream_requests_per_second: ClientConfig::default().requests_per_second,
            upstream_max_retries: ClientConfig::default().max_retries,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable or the source table cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let sources = match env::var("UPSTREAM_SOURCES") {
            Ok(raw) => parse_sources(&raw).context("Failed to parse UPSTREAM_SOURCES")?,
            Err(_) => defaults.sources,
        };

        Ok(Self {
            listen_addr: env::var("LISTEN").unwrap_or(defaults.listen_addr),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            updates_url: env::var("UPSTREAM_UPDATES_URL").unwrap_or(defaults.updates_url),
            sources,
            upstream_timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS")?
                .unwrap_or(defaults.upstream_timeout_secs),
            upstream_requests_per_second: parse_var("UPSTREAM_REQUESTS_PER_SECOND")?
                .unwrap_or(defaults.upstream_requests_per_second),
            upstream_max_retries: parse_var("UPSTREAM_MAX_RETRIES")?
                .unwrap_or(defaults.upstream_max_retries),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `listen_addr` is not a socket address
    /// - `log_format` is not `text` or `json`
    /// - the upstream URLs are not http(s) or the source table is empty
    /// - the timeout is zero or the request rate is negative
    pub fn validate(&self) -> Result<()> {
        self.listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("LISTEN must be 'host:port', got '{}'", self.listen_addr))?;

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !is_http_url(&self.updates_url) {
            anyhow::bail!(
                "UPSTREAM_UPDATES_URL must start with 'http://' or 'https://', got '{}'",
                self.updates_url
            );
        }

        if self.sources.is_empty() {
            anyhow::bail!("UPSTREAM_SOURCES must contain at least one entry");
        }

        if let Some((prefix, base)) = self.sources.iter().find(|(_, base)| !is_http_url(base)) {
            anyhow::bail!(
                "UPSTREAM_SOURCES entry '{}' must point at an http(s) URL, got '{}'",
                prefix,
                base
            );
        }

        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than 0");
        }

        let rate = self.upstream_requests_per_second;
        if rate.is_nan() || rate < 0.0 {
            anyhow::bail!(
                "UPSTREAM_REQUESTS_PER_SECOND must not be negative, got {}",
                self.upstream_requests_per_second
            );
        }

        Ok(())
    }

    /// HTTP client settings for the upstream.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            requests_per_second: self.upstream_requests_per_second,
            timeout_secs: self.upstream_timeout_secs,
            max_retries: self.upstream_max_retries,
            ..ClientConfig::default()
        }
    }

    /// Upstream URL layout.
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            updates_url: self.updates_url.clone(),
            resolver: SourceResolver::with_sources(self.sources.iter().cloned()),
        }
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Updates URL: {}", self.updates_url);
        for (prefix, base) in &self.sources {
            tracing::info!("  Source {}: {}", prefix, base);
        }
        tracing::info!(
            "  Upstream: timeout {}s, {} req/s, {} retries",
            self.upstream_timeout_secs,
            self.upstream_requests_per_second,
            self.upstream_max_retries
        );
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Parse an optional numeric variable; a set but malformed value is an error.
fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has invalid value '{}'", key, raw)),
        Err(_) => Ok(None),
    }
}

/// Parse `prefix=url,prefix=url` into pairs.
fn parse_sources(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (prefix, base) = entry
                .split_once('=')
                .with_context(|| format!("expected 'prefix=url', got '{}'", entry))?;
            let (prefix, base) = (prefix.trim(), base.trim());
            if prefix.is_empty() || prefix.contains('-') || base.is_empty() {
                anyhow::bail!("invalid source entry '{}'", entry);
            }
            Ok((prefix.to_string(), base.to_string()))
        })
        .collect()
}

/// Loads and validates configuration from environment variables.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "LISTEN",
        "RUST_LOG",
        "LOG_FORMAT",
        "UPSTREAM_UPDATES_URL",
        "UPSTREAM_SOURCES",
        "UPSTREAM_TIMEOUT_SECS",
        "UPSTREAM_REQUESTS_PER_SECOND",
        "UPSTREAM_MAX_RETRIES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.listen_addr = "localhost".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upstream_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upstream_requests_per_second = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sources.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sources.push(("xx".to_string(), "ftp://mirror".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_sources() {
        let sources = parse_sources(" cu=https://a.example , mu=https://b.example/ ").unwrap();
        assert_eq!(
            sources,
            vec![
                ("cu".to_string(), "https://a.example".to_string()),
                ("mu".to_string(), "https://b.example/".to_string()),
            ]
        );

        assert!(parse_sources("cu").is_err());
        assert!(parse_sources("=https://a.example").is_err());
        assert!(parse_sources("c-u=https://a.example").is_err());
    }

    #[test]
    fn test_site_config_uses_sources() {
        let mut config = Config::default();
        config.sources = vec![("xx".to_string(), "http://mirror.local/".to_string())];

        let site = config.site_config();
        assert_eq!(site.resolver.resolve_base("xx").unwrap(), "http://mirror.local");
        assert!(site.resolver.resolve_base("cu").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("LISTEN", "127.0.0.1:8080");
        env::set_var("LOG_FORMAT", "json");
        env::set_var("UPSTREAM_SOURCES", "cu=http://localhost:9000/cu");
        env::set_var("UPSTREAM_TIMEOUT_SECS", "3");
        env::set_var("UPSTREAM_MAX_RETRIES", "0");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.log_format, "json");
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.client_config().timeout_secs, 3);
        assert_eq!(config.client_config().max_retries, 0);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_malformed_number() {
        clear_env();
        env::set_var("UPSTREAM_TIMEOUT_SECS", "soon");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
