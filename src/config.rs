//! Configuration loading for nerview.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.nerview/config.toml` (user)
//!
//! Missing files are fine: everything can also come from CLI flags and
//! environment variables. Secrets are loaded separately with mandatory
//! permission checks from `~/.nerview/secrets.toml` (must be 0600).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{NerviewError, Result};

/// Fixed base of every Hub endpoint URL. Only the suffix after it varies.
pub const HUB_URL_PREFIX: &str = "https://api.cellstrathub.com/";

/// Environment variable consulted for the API key when neither the CLI
/// flag nor the secrets file provides one.
pub const API_KEY_ENV: &str = "HUB_API_KEY";

/// Environment variable consulted for the endpoint suffix.
pub const ENDPOINT_ENV: &str = "HUB_ENDPOINT";

/// Build the full endpoint URL from a user-supplied suffix.
///
/// The suffix is appended verbatim: no URL-encoding, no slash
/// normalisation. An empty suffix yields the bare prefix, which is
/// well-formed but will not name a deployed endpoint.
pub fn hub_url(suffix: &str) -> String {
    format!("{HUB_URL_PREFIX}{suffix}")
}

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Endpoint selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint suffix appended to the fixed Hub prefix
    /// (typically `<username>/<api-name>`).
    #[serde(default)]
    pub suffix: Option<String>,
}

/// HTTP client tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 60, enough for a cold model load).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided, must exist)
    /// 2. `~/.nerview/config.toml`
    ///
    /// Returns defaults if no file exists; flags and env vars can carry
    /// the whole configuration.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match Self::resolve_config_path(explicit_path)? {
            Some(path) => path,
            None => return Ok(Config::default()),
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            NerviewError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            NerviewError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. `Ok(None)` means "no file, use defaults".
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(NerviewError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".nerview").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }
}

/// Secrets configuration (API key).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub hub: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Secrets {
    /// Load secrets from `~/.nerview/secrets.toml` with a permission check.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// `HUB_API_KEY` environment variable or a CLI flag instead).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".nerview").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        Ok(Secrets::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NerviewError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            NerviewError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            NerviewError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(NerviewError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        // Permission check not available on non-Unix platforms
        Ok(())
    }

    /// Get the API key, falling back to the `HUB_API_KEY` environment variable.
    pub fn api_key(&self) -> Option<String> {
        self.hub
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_appends_suffix_verbatim() {
        assert_eq!(
            hub_url("alice/ner-api"),
            "https://api.cellstrathub.com/alice/ner-api"
        );
    }

    #[test]
    fn url_does_not_normalise_slashes() {
        assert_eq!(
            hub_url("/alice//ner"),
            "https://api.cellstrathub.com//alice//ner"
        );
    }

    #[test]
    fn empty_suffix_yields_bare_prefix() {
        assert_eq!(hub_url(""), HUB_URL_PREFIX);
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.endpoint.suffix, None);
        assert_eq!(config.client.timeout_secs, 60);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [endpoint]
            suffix = "alice/ner-api"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.endpoint.suffix, Some("alice/ner-api".to_string()));
        // Defaults preserved
        assert_eq!(config.client.timeout_secs, 60);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [endpoint]
            suffix = "alice/ner-api"

            [client]
            timeout_secs = 60
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.endpoint.suffix, Some("alice/ner-api".to_string()));
        assert_eq!(config.client.timeout_secs, 60);
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [hub]
            api_key = "hub-test-key"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.hub.as_ref().unwrap().api_key, "hub-test-key");
    }

    #[test]
    fn api_key_from_secrets() {
        let secrets = Secrets {
            hub: Some(ApiKeySecret {
                api_key: "from-file".to_string(),
            }),
        };
        assert_eq!(secrets.api_key(), Some("from-file".to_string()));
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[cfg(unix)]
    #[test]
    fn secrets_permissions_enforced() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[hub]\napi_key = \"k\"\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        let err = Secrets::check_permissions(&path).unwrap_err().to_string();
        assert!(err.contains("insecure permissions"));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        assert!(Secrets::check_permissions(&path).is_ok());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o400)).unwrap();
        assert!(Secrets::check_permissions(&path).is_ok());
    }

    #[test]
    fn load_secrets_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[hub]\napi_key = \"from-disk\"\n").unwrap();

        let secrets = Secrets::load_from_file(&path).unwrap();
        assert_eq!(secrets.hub.unwrap().api_key, "from-disk");
    }
}
