//! Layered server settings.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. an optional TOML file (`config/roster.toml`, or the path in `ROSTER_CONFIG`)
//! 3. environment variables prefixed with `ROSTER_`, sections split by `__`
//!    (e.g. `ROSTER_CACHE__URL`, `ROSTER_SERVER__PORT`)

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use roster_cache::{CacheError, Namespace, RemoteConfig};
use serde::Deserialize;
use thiserror::Error;

/// Default settings file, without extension.
pub const DEFAULT_CONFIG_FILE: &str = "config/roster";

/// Environment variable naming an explicit settings file.
pub const CONFIG_PATH_ENV: &str = "ROSTER_CONFIG";

/// Error loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid listen address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid cache settings: {0}")]
    InvalidCache(#[from] CacheError),
}

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub log: LogSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Adds permissive CORS headers.
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors: true,
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Redis URL (default: `redis://127.0.0.1:6379`)
    pub url: String,
    /// Key prefix (default: `students`)
    pub namespace: String,
    /// Startup connect timeout in seconds (default: 5)
    pub connect_timeout_secs: u64,
    /// TTL for `GET /api/students` in seconds (default: 60)
    pub list_ttl_secs: u64,
    /// TTL for `GET /api/students/{id}` in seconds (default: 300)
    pub item_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            namespace: "students".to_string(),
            connect_timeout_secs: 5,
            list_ttl_secs: 60,
            item_ttl_secs: 300,
        }
    }
}

impl CacheSettings {
    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig::new(&self.url)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }

    /// Parsed key namespace.
    ///
    /// # Errors
    ///
    /// `CacheError::InvalidNamespace` if the name is empty or holds glob
    /// metacharacters.
    pub fn namespace(&self) -> Result<Namespace, CacheError> {
        Namespace::new(&self.namespace)
    }

    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.list_ttl_secs)
    }

    pub fn item_ttl(&self) -> Duration {
        Duration::from_secs(self.item_ttl_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from the default file location and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from(Some(Path::new(&path)), true),
            Err(_) => Self::load_from(Some(Path::new(DEFAULT_CONFIG_FILE)), false),
        }
    }

    /// Loads settings from an optional file plus the environment.
    ///
    /// With `required = false` a missing file is skipped. The cache namespace
    /// is validated here so a bad one fails startup.
    pub fn load_from(path: Option<&Path>, required: bool) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(required));
        }

        let settings: Self = builder
            .add_source(
                Environment::with_prefix("ROSTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.cache.namespace()?;

        Ok(settings)
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> Result<SocketAddr, SettingsError> {
        let address = format!("{}:{}", self.server.host, self.server.port);
        address
            .parse()
            .map_err(|e: std::net::AddrParseError| SettingsError::InvalidAddress {
                reason: e.to_string(),
                address,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.cache.namespace, "students");
        assert_eq!(settings.cache.list_ttl(), Duration::from_secs(60));
        assert_eq!(settings.cache.item_ttl(), Duration::from_secs(300));
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let settings =
            Settings::load_from(Some(Path::new("does/not/exist.toml")), false).unwrap();

        assert_eq!(settings.cache.url, "redis://127.0.0.1:6379");
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Settings::load_from(Some(Path::new("does/not/exist.toml")), true);

        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8081

[cache]
url = "redis://cache:6379"
list_ttl_secs = 5
"#
        )
        .unwrap();

        let settings = Settings::load_from(Some(file.path()), true).unwrap();

        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.cache.url, "redis://cache:6379");
        assert_eq!(settings.cache.list_ttl(), Duration::from_secs(5));
        assert_eq!(settings.cache.item_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_listen_addr() {
        let settings = Settings::default();
        assert_eq!(settings.listen_addr().unwrap().port(), 3000);

        let mut bad = Settings::default();
        bad.server.host = "not a host".to_string();
        assert!(matches!(
            bad.listen_addr(),
            Err(SettingsError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_cache_settings_conversions() {
        let cache = CacheSettings {
            connect_timeout_secs: 2,
            namespace: "pupils:".to_string(),
            ..Default::default()
        };

        assert_eq!(cache.remote().connect_timeout, Duration::from_secs(2));
        assert_eq!(cache.namespace().unwrap().as_str(), "pupils");
    }

    #[test]
    fn test_glob_namespace_fails_to_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[cache]
namespace = "students*"
"#
        )
        .unwrap();

        let result = Settings::load_from(Some(file.path()), true);

        assert!(matches!(
            result,
            Err(SettingsError::InvalidCache(CacheError::InvalidNamespace { .. }))
        ));
    }

    #[test]
    fn test_empty_namespace_is_rejected() {
        let cache = CacheSettings {
            namespace: " ".to_string(),
            ..Default::default()
        };

        assert!(cache.namespace().is_err());
    }
}
