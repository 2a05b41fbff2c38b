//! App definition — the immutable descriptor of one app hosted on the device.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PixelHubError, ValidationError};

/// Descriptor supplied when an app is constructed.
///
/// The name doubles as the store path segment and the identifier the remote
/// device knows the app by, so it stays fixed for the app's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppDefinition {
    name: String,
}

impl AppDefinition {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyAppName`] for an empty name and
    /// [`ValidationError::InvalidAppName`] when the name contains a path
    /// separator.
    pub fn new(name: impl Into<String>) -> Result<Self, PixelHubError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyAppName.into());
        }
        if name.contains('.') {
            return Err(ValidationError::InvalidAppName(name).into());
        }
        Ok(Self { name })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<'de> Deserialize<'de> for AppDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            name: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.name).map_err(serde::de::Error::custom)
    }
}
