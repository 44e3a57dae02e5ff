//! Client configuration.
//!
//! Two remotes are configured independently: the verification provider and
//! the client-KYC record endpoint. Both load from environment variables with
//! production defaults, or are built explicitly for tests.

use url::Url;
use zeroize::Zeroizing;

/// Default verification provider base URL.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.gridlines.io";

/// Request timeout when no `*_TIMEOUT_SECS` variable is set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the verification provider.
///
/// Custom `Debug` implementation redacts the `api_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Provider base URL. Endpoint paths are appended to it.
    pub base_url: Url,
    /// API key sent in the `X-API-Key` header.
    pub api_key: Zeroizing<String>,
    /// Value of the `X-Auth-Type` header.
    pub auth_type: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("auth_type", &self.auth_type)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KYC_API_BASE_URL` (default: `https://api.gridlines.io`)
    /// - `KYC_API_KEY` (required)
    /// - `KYC_AUTH_TYPE` (default: `API-Key`)
    /// - `KYC_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("KYC_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            base_url: env_url("KYC_API_BASE_URL", DEFAULT_PROVIDER_URL)?,
            api_key: Zeroizing::new(api_key),
            auth_type: std::env::var("KYC_AUTH_TYPE").unwrap_or_else(|_| "API-Key".to_string()),
            timeout_secs: env_timeout("KYC_TIMEOUT_SECS")?,
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            api_key: Zeroizing::new(api_key.to_string()),
            auth_type: "API-Key".to_string(),
            timeout_secs: 5,
        })
    }
}

/// Configuration for the client-KYC record endpoint.
#[derive(Clone)]
pub struct RecordsConfig {
    /// Base URL of the record-keeping service.
    pub base_url: Url,
    /// Bearer token for the record-keeping service.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RecordsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordsConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RecordsConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KYC_RECORDS_URL` (required)
    /// - `KYC_RECORDS_TOKEN` (required)
    /// - `KYC_RECORDS_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("KYC_RECORDS_URL")
            .map_err(|_| ConfigError::MissingVar("KYC_RECORDS_URL".to_string()))?;
        let api_token = std::env::var("KYC_RECORDS_TOKEN")
            .map_err(|_| ConfigError::MissingVar("KYC_RECORDS_TOKEN".to_string()))?;

        Ok(Self {
            base_url: parse_url("KYC_RECORDS_URL", &raw)?,
            api_token: Zeroizing::new(api_token),
            timeout_secs: env_timeout("KYC_RECORDS_TIMEOUT_SECS")?,
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            api_token: Zeroizing::new(token.to_string()),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_url(var, &raw)
}

fn env_timeout(var: &str) -> Result<u64, ConfigError> {
    parse_timeout(var, std::env::var(var).ok().as_deref())
}

/// Unset means the default; set but not a positive integer is an error.
fn parse_timeout(name: &str, raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TIMEOUT_SECS);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(
            name.to_string(),
            raw.to_string(),
        )),
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))
}

/// Join an endpoint path onto a base URL, tolerating a base with or without
/// a trailing slash and a path prefix.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("KYC_API_KEY environment variable is required")]
    MissingApiKey,
    #[error("{0} environment variable is required")]
    MissingVar(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid header value for {0}")]
    InvalidHeader(String),
    #[error("invalid timeout for {0}: {1:?} (expected a positive number of seconds)")]
    InvalidTimeout(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = ProviderConfig::local_mock("http://127.0.0.1:9000", "test-key").unwrap();
        assert_eq!(cfg.api_key.as_str(), "test-key");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = ProviderConfig::local_mock("http://127.0.0.1:9000", "super-secret").unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("[REDACTED]"));

        let rec = RecordsConfig::local_mock("http://127.0.0.1:9001", "tok-secret").unwrap();
        assert!(!format!("{rec:?}").contains("tok-secret"));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("NONEXISTENT_KYC_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            ProviderConfig::local_mock("not a url", "k"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }

    #[test]
    fn timeout_defaults_only_when_unset() {
        assert_eq!(parse_timeout("KYC_TIMEOUT_SECS", None).unwrap(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(parse_timeout("KYC_TIMEOUT_SECS", Some(" 45 ")).unwrap(), 45);
        for bad in ["thirty", "", "-5", "0", "1.5"] {
            assert!(matches!(
                parse_timeout("KYC_TIMEOUT_SECS", Some(bad)),
                Err(ConfigError::InvalidTimeout(name, raw)) if name == "KYC_TIMEOUT_SECS" && raw == bad
            ));
        }
    }

    #[test]
    fn endpoint_url_handles_slashes() {
        let base = Url::parse("http://127.0.0.1:9000").unwrap();
        assert_eq!(
            endpoint_url(&base, "/pan-api/fetch"),
            "http://127.0.0.1:9000/pan-api/fetch"
        );
        let base = Url::parse("http://host/prefix/").unwrap();
        assert_eq!(endpoint_url(&base, "bank-api/verify"), "http://host/prefix/bank-api/verify");
    }
}
