//! Device connection configuration.

use serde::Deserialize;

/// Where and how to reach the device.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AwtrixConfig {
    /// Device hostname or IP address.
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// Basic-auth user, when the device has authentication enabled.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl AwtrixConfig {
    /// Root URL of the device API (`http://host:port`).
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for AwtrixConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 80,
            username: None,
            password: None,
            timeout_secs: 5,
        }
    }
}
