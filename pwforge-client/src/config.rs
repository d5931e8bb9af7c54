//! Client configuration.
//!
//! Settings are layered, later sources winning:
//! 1. Built-in defaults (30 second timeout)
//! 2. A TOML file, by default `config.toml` in the platform config directory
//! 3. Environment variables `PASSWORK_HOST`, `PASSWORK_API_KEY`, `PASSWORK_TIMEOUT`
//!
//! ```toml
//! host = "https://passwork.example.com"
//! api_key = "..."
//! timeout = 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use pwforge_core::Secret;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Environment variable holding the service URL.
pub const ENV_HOST: &str = "PASSWORK_HOST";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "PASSWORK_API_KEY";

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "PASSWORK_TIMEOUT";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the API below the host.
const API_PATH: &str = "api/v4";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting has no value in any source.
    #[error("missing {field}: set it in the config file or via the {env} environment variable")]
    Missing {
        field: &'static str,
        env: &'static str,
    },

    /// The host is not an absolute http(s) URL.
    #[error("invalid host '{host}': {message}")]
    InvalidHost { host: String, message: String },

    /// The timeout is not a whole number of seconds.
    #[error("invalid timeout '{value}': expected whole seconds")]
    InvalidTimeout { value: String },

    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[cfg(feature = "config-file")]
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Raw settings from one source; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub host: Option<String>,
    pub api_key: Option<Secret>,
    pub timeout: Option<u64>,
}

impl FileConfig {
    /// Read a TOML config file.
    #[cfg(feature = "config-file")]
    pub fn read(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values from the environment.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn overlay_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = get(ENV_HOST) {
            debug!("using host from {}", ENV_HOST);
            self.host = Some(host);
        }
        if let Some(api_key) = get(ENV_API_KEY) {
            debug!("using api key from {}", ENV_API_KEY);
            self.api_key = Some(Secret::new(api_key));
        }
        if let Some(value) = get(ENV_TIMEOUT) {
            let secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout { value })?;
            self.timeout = Some(secs);
        }
        Ok(self)
    }
}

/// Resolved settings for [`crate::PassworkClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service URL, without the API path.
    pub host: Url,
    pub api_key: Secret,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config from explicit values with the default timeout.
    pub fn new(host: &str, api_key: impl Into<Secret>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ConfigError::Missing {
                field: "api_key",
                env: ENV_API_KEY,
            });
        }
        Ok(Self {
            host: parse_host(host)?,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the default config file (if present) and the environment.
    #[cfg(feature = "config-file")]
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load from a config file and the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    #[cfg(feature = "config-file")]
    pub fn load_from(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::read(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => {
                    debug!("loading config from {:?}", path);
                    FileConfig::read(&path)?
                }
                _ => FileConfig::default(),
            },
        };
        Self::resolve(file.overlay_env(|key| std::env::var(key).ok())?)
    }

    /// Load from the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(FileConfig::default().overlay_env(|key| std::env::var(key).ok())?)
    }

    /// Validate merged settings.
    pub fn resolve(raw: FileConfig) -> Result<Self, ConfigError> {
        let host = raw
            .host
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::Missing {
                field: "host",
                env: ENV_HOST,
            })?;
        let api_key = raw.api_key.ok_or(ConfigError::Missing {
            field: "api_key",
            env: ENV_API_KEY,
        })?;

        let config = Self::new(&host, api_key)?;
        Ok(match raw.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        })
    }

    /// Base URL of the v4 API, e.g. `https://host/api/v4`.
    pub fn api_base(&self) -> Url {
        let mut base = self.host.clone();
        let path = format!("{}/{}", base.path().trim_end_matches('/'), API_PATH);
        base.set_path(&path);
        base
    }
}

fn parse_host(host: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidHost {
        host: host.to_string(),
        message,
    };
    let url = Url::parse(host.trim()).map_err(|e| invalid(e.to_string()))?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(invalid(format!("unsupported scheme '{}'", url.scheme())))
    }
}

/// Get the default config file path.
#[cfg(feature = "config-file")]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "raibid-labs", "pwforge")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_api_base() {
        let config = ClientConfig::new("https://passwork.example.com", "key").unwrap();
        assert_eq!(config.api_base().as_str(), "https://passwork.example.com/api/v4");

        let config = ClientConfig::new("https://example.com/passwork/", "key").unwrap();
        assert_eq!(config.api_base().as_str(), "https://example.com/passwork/api/v4");
    }

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("https://example.com", "key").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig {
            host: Some("https://file.example.com".to_string()),
            api_key: Some(Secret::new("file-key")),
            timeout: Some(10),
        };
        let raw = file
            .overlay_env(env(&[(ENV_API_KEY, "env-key"), (ENV_TIMEOUT, "5")]))
            .unwrap();
        let config = ClientConfig::resolve(raw).unwrap();

        assert_eq!(config.host.as_str(), "https://file.example.com/");
        assert_eq!(config.api_key.expose(), "env-key");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let file = FileConfig {
            host: Some("https://file.example.com".to_string()),
            api_key: Some(Secret::new("file-key")),
            timeout: None,
        };
        let raw = file.overlay_env(env(&[(ENV_HOST, "")])).unwrap();
        assert_eq!(raw.host.as_deref(), Some("https://file.example.com"));
    }

    #[test]
    fn test_missing_settings() {
        let err = ClientConfig::resolve(FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "host", env: ENV_HOST }));

        let raw = FileConfig::default()
            .overlay_env(env(&[(ENV_HOST, "https://example.com")]))
            .unwrap();
        let err = ClientConfig::resolve(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "api_key", .. }));
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ClientConfig::new("not a url", "key"),
            Err(ConfigError::InvalidHost { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.com", "key"),
            Err(ConfigError::InvalidHost { .. })
        ));
        assert!(matches!(
            FileConfig::default().overlay_env(env(&[(ENV_TIMEOUT, "soon")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_read_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "host = \"https://passwork.example.com\"\napi_key = \"k\"\ntimeout = 12\n",
        )
        .unwrap();

        let config = ClientConfig::resolve(FileConfig::read(&path).unwrap()).unwrap();
        assert_eq!(config.api_key.expose(), "k");
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_read_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();

        let missing = dir.path().join("absent.toml");
        assert!(matches!(FileConfig::read(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "host = [").unwrap();
        assert!(matches!(FileConfig::read(&broken), Err(ConfigError::Parse { .. })));
    }
}
