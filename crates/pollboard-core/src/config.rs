// Configuration loading and parsing (pollboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "POLLBOARD_CONFIG";

/// Environment variable overriding `[backend] url`.
pub const BACKEND_URL_ENV: &str = "POLLBOARD_BACKEND_URL";

const CONFIG_FILE_NAME: &str = "pollboard.toml";
const CREDENTIAL_FILE_NAME: &str = "credential";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("could not determine the platform config directory")]
    NoHomeDirectory,
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub identity: IdentityConfig,
    pub live: LiveConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin of the polling API, e.g. `http://localhost:5000`.
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            url: "http://localhost:5000".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdentityConfig {
    /// Client identifier registered with the identity provider.
    pub client_id: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig {
            client_id: "pollboard".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LiveConfig {
    pub enabled: bool,
    /// Path of the server-sent event stream on the backend origin.
    pub path: String,
}

impl Default for LiveConfig {
    fn default() -> Self {
        LiveConfig {
            enabled: true,
            path: "/api/events".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Where the sign-in credential is kept. Defaults to the platform data
    /// directory.
    pub credential_path: Option<PathBuf>,
}

impl Config {
    /// Backend base URL without surrounding whitespace or a trailing slash.
    pub fn backend_url(&self) -> &str {
        self.backend.url.trim().trim_end_matches('/')
    }

    /// Full URL of the live-update stream.
    pub fn live_url(&self) -> String {
        format!("{}{}", self.backend_url(), self.live.path)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `path`. A missing file yields the
/// defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = if path.exists() {
        let text = read_file(path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

/// Load config from `$POLLBOARD_CONFIG` or the platform config directory,
/// apply environment overrides, and fill in the credential path.
pub fn load_config() -> Result<Config, ConfigError> {
    let dirs = project_dirs()?;
    let path = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(p) => PathBuf::from(p),
        None => dirs.config_dir().join(CONFIG_FILE_NAME),
    };

    let mut config = load_config_from(&path)?;

    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        override_backend_url(&mut config, &url)?;
    }

    if config.storage.credential_path.is_none() {
        config.storage.credential_path = Some(dirs.data_dir().join(CREDENTIAL_FILE_NAME));
    }

    Ok(config)
}

/// Replace the backend URL, trimmed, and re-validate.
fn override_backend_url(config: &mut Config, url: &str) -> Result<(), ConfigError> {
    config.backend.url = url.trim().to_string();
    validate(config)
}

fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("", "", "pollboard").ok_or(ConfigError::NoHomeDirectory)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.backend.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "backend.url".into(),
            message: format!("must be an http(s) URL, got {url:?}"),
        });
    }

    if config.identity.client_id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "identity.client_id".into(),
            message: "must not be empty".into(),
        });
    }

    if !config.live.path.starts_with('/') {
        return Err(ConfigError::ValidationError {
            field: "live.path".into(),
            message: format!("must start with '/', got {:?}", config.live.path),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pollboard_config_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("pollboard_config_absent/nope.toml");
        let config = load_config_from(&path).expect("defaults should validate");
        assert_eq!(config, Config::default());
        assert_eq!(config.backend_url(), "http://localhost:5000");
        assert!(config.live.enabled);
    }

    #[test]
    fn full_file_is_parsed() {
        let path = write_config(
            "full",
            r#"
            [backend]
            url = "https://polls.example.com/"

            [identity]
            client_id = "1234.apps.example.com"

            [live]
            enabled = false
            path = "/stream"

            [storage]
            credential_path = "/tmp/pollboard-cred"
            "#,
        );
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend_url(), "https://polls.example.com");
        assert_eq!(config.identity.client_id, "1234.apps.example.com");
        assert!(!config.live.enabled);
        assert_eq!(config.live_url(), "https://polls.example.com/stream");
        assert_eq!(
            config.storage.credential_path,
            Some(PathBuf::from("/tmp/pollboard-cred"))
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = write_config(
            "partial",
            r#"
            [backend]
            url = "http://10.0.0.5:5000"
            "#,
        );
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend.url, "http://10.0.0.5:5000");
        assert_eq!(config.live, LiveConfig::default());
        assert_eq!(config.identity, IdentityConfig::default());
    }

    #[test]
    fn backend_url_override_is_trimmed() {
        let mut config = Config::default();
        override_backend_url(&mut config, "  https://polls.example.com/ \n").unwrap();
        assert_eq!(config.backend.url, "https://polls.example.com/");
        assert_eq!(config.backend_url(), "https://polls.example.com");
        assert_eq!(config.live_url(), "https://polls.example.com/api/events");

        assert!(override_backend_url(&mut config, "   ").is_err());
    }

    #[test]
    fn padded_url_from_file_is_trimmed_on_use() {
        let mut config = Config::default();
        config.backend.url = " http://localhost:5000/ ".into();
        assert_eq!(config.backend_url(), "http://localhost:5000");
    }

    #[test]
    fn rejects_non_http_url() {
        let path = write_config(
            "bad_url",
            r#"
            [backend]
            url = "ftp://example.com"
            "#,
        );
        match load_config_from(&path) {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "backend.url"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_relative_live_path() {
        let path = write_config(
            "bad_live",
            r#"
            [live]
            path = "events"
            "#,
        );
        match load_config_from(&path) {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "live.path"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_client_id() {
        let path = write_config(
            "bad_client",
            r#"
            [identity]
            client_id = "  "
            "#,
        );
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let path = write_config("invalid", "[backend\nurl = ");
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
