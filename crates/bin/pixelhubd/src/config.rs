//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `pixelhub.toml` in the working directory (or the path in
//! `PIXELHUB_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;

use serde::Deserialize;

use pixelhub_adapter_awtrix_http::AwtrixConfig;
use pixelhub_app::lifecycle::LifecycleOptions;
use pixelhub_domain::app::AppDefinition;
use pixelhub_domain::path::Namespace;

const DEFAULT_PATH: &str = "pixelhub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Adapter-wide behaviour.
    pub adapter: AdapterConfig,
    /// Device connection.
    pub awtrix: AwtrixConfig,
    /// Apps hosted on the device.
    pub apps: Vec<AppDefinition>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Adapter-wide behaviour.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Store namespace owned by this instance.
    pub namespace: String,
    /// Delete every app from the device on shutdown.
    pub remove_apps_on_stop: bool,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PIXELHUB_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PIXELHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PIXELHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("PIXELHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("PIXELHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("PIXELHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("PIXELHUB_AWTRIX_HOST") {
            self.awtrix.host = val;
        }
        if let Ok(val) = std::env::var("PIXELHUB_REMOVE_APPS_ON_STOP") {
            if let Some(flag) = parse_flag(&val) {
                self.adapter.remove_apps_on_stop = flag;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.awtrix.port == 0 {
            return Err(ConfigError::Validation(
                "awtrix port must be non-zero".to_string(),
            ));
        }
        if self.awtrix.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "awtrix timeout_secs must be non-zero".to_string(),
            ));
        }
        self.namespace()?;

        let mut seen = HashSet::new();
        for app in &self.apps {
            if !seen.insert(app.name()) {
                return Err(ConfigError::Validation(format!(
                    "app {:?} is configured twice",
                    app.name()
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// The validated store namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the namespace is malformed.
    pub fn namespace(&self) -> Result<Namespace, ConfigError> {
        Namespace::new(self.adapter.namespace.as_str()).map_err(|err| {
            ConfigError::Validation(format!(
                "invalid namespace {:?}: {err}",
                self.adapter.namespace
            ))
        })
    }

    /// Lifecycle switches handed to every app.
    #[must_use]
    pub fn lifecycle_options(&self) -> LifecycleOptions {
        LifecycleOptions {
            remove_apps_on_stop: self.adapter.remove_apps_on_stop,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:pixelhub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pixelhubd=info,pixelhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            namespace: "pixelhub.0".to_string(),
            remove_apps_on_stop: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
