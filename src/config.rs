use crate::catalog::DEFAULT_MAX_KNOWN_ID;
use crate::error::{HarnessError, HarnessResult};
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_GENERIC_TIMEOUT_SECS: u64 = 30;
const JSON_CONTENT_TYPE: &str = "application/json";

/// Resolved harness settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarnessConfig {
    /// Service root, without trailing slash
    pub base_url: String,
    /// Sent with every request; request-level headers win on conflict
    pub default_headers: BTreeMap<String, String>,
    /// Connect timeout
    pub request_timeout: Duration,
    /// Timeout for a whole request round trip
    pub generic_timeout: Duration,
    /// Number of records the remote service currently exposes.
    ///
    /// This is an external coupling, not a computed value: ids `1..=max_known_id`
    /// are assumed to exist and `max_known_id + 1` is assumed not to. Keep it in
    /// sync with the service's dataset.
    pub max_known_id: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: default_headers(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            generic_timeout: Duration::from_secs(DEFAULT_GENERIC_TIMEOUT_SECS),
            max_known_id: DEFAULT_MAX_KNOWN_ID,
        }
    }
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
        ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
    ])
}

impl HarnessConfig {
    /// Default configuration pointed at another service root (used by tests
    /// against a local fake).
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_max_known_id(mut self, max_known_id: u64) -> Self {
        self.max_known_id = max_known_id;
        self
    }

    /// Merge CLI/env values over an optional config file over defaults.
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            base_url: cli_base_url,
            max_known_id: cli_max_known_id,
            timeout_secs: cli_timeout_secs,
            generic_timeout_secs: cli_generic_timeout_secs,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            base_url: file_base_url,
            headers: file_headers,
            max_known_id: file_max_known_id,
            timeout_secs: file_timeout_secs,
            generic_timeout_secs: file_generic_timeout_secs,
        } = file_config;

        let base_url = cli_base_url
            .or(file_base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let mut default_headers = default_headers();
        if let Some(headers) = file_headers {
            default_headers.extend(headers);
        }

        let max_known_id = cli_max_known_id
            .or(file_max_known_id)
            .unwrap_or(DEFAULT_MAX_KNOWN_ID);

        let request_timeout = Duration::from_secs(
            cli_timeout_secs
                .or(file_timeout_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );
        let generic_timeout = Duration::from_secs(
            cli_generic_timeout_secs
                .or(file_generic_timeout_secs)
                .unwrap_or(DEFAULT_GENERIC_TIMEOUT_SECS),
        );

        Ok(Self {
            base_url,
            default_headers,
            request_timeout,
            generic_timeout,
            max_known_id,
        })
    }

    /// Fail fast on settings no request could succeed with.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.base_url.is_empty() {
            return Err(HarnessError::Config("base URL must not be empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(HarnessError::Config(format!(
                "base URL {:?} must start with http:// or https://",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() || self.generic_timeout.is_zero() {
            return Err(HarnessError::Config("timeouts must be greater than zero".to_string()));
        }
        if self.max_known_id == 0 {
            return Err(HarnessError::Config(
                "max known id must be at least 1".to_string(),
            ));
        }
        if let Some((name, _)) = self.default_headers.iter().find(|(name, _)| name.trim().is_empty()) {
            return Err(HarnessError::Config(format!("invalid header name {name:?}")));
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "product-harness", about = "Product API test harness", version)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML, JSON or TOML)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "PRODUCT_API_BASE_URL",
        value_name = "URL",
        help = "Root URL of the product service",
        global = true
    )]
    pub base_url: Option<String>,

    #[arg(
        long,
        env = "PRODUCT_API_MAX_KNOWN_ID",
        value_name = "N",
        help = "Number of records the service currently exposes",
        value_parser = clap::value_parser!(u64),
        global = true
    )]
    pub max_known_id: Option<u64>,

    #[arg(
        long,
        env = "PRODUCT_API_TIMEOUT_SECS",
        value_name = "SECS",
        help = "Connect timeout in seconds",
        value_parser = clap::value_parser!(u64),
        global = true
    )]
    pub timeout_secs: Option<u64>,

    #[arg(
        long,
        env = "PRODUCT_API_GENERIC_TIMEOUT_SECS",
        value_name = "SECS",
        help = "Whole-request timeout in seconds",
        value_parser = clap::value_parser!(u64),
        global = true
    )]
    pub generic_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    base_url: Option<String>,
    headers: Option<BTreeMap<String, String>>,
    max_known_id: Option<u64>,
    timeout_secs: Option<u64>,
    generic_timeout_secs: Option<u64>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        "toml" => toml::from_str(&contents)
            .with_context(|| format!("failed to parse TOML config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_service() {
        let config = HarnessConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.generic_timeout, Duration::from_secs(30));
        assert_eq!(config.max_known_id, 194);
        assert_eq!(
            config.default_headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        let mut config = HarnessConfig::for_base_url("ftp://example.com/");
        assert!(config.validate().is_err());

        config.base_url = "http://127.0.0.1:9".to_string();
        config.max_known_id = 0;
        let err = config.validate().expect_err("zero max id");
        assert!(err.to_string().contains("max known id"));

        config.max_known_id = 5;
        config.generic_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
