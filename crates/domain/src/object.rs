//! Stored objects — typed metadata records persisted in the object store.
//!
//! The JSON shape is part of the persisted contract:
//!
//! ```json
//! { "type": "state",
//!   "common": { "name": { "en": "Visible" }, "type": "boolean",
//!               "role": "switch.enable", "read": true, "write": true, "def": true },
//!   "native": { "name": "Weather" } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Language used when a requested translation is missing.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Kind of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    State,
    Channel,
    Device,
    Folder,
}

/// Declared value type of a state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Number,
    String,
    Json,
    Mixed,
}

impl ValueType {
    /// Whether `value` is acceptable for a state of this type.
    ///
    /// `null` is always accepted; it clears the value.
    #[must_use]
    pub fn accepts(self, value: &serde_json::Value) -> bool {
        use serde_json::Value;

        match (self, value) {
            (_, Value::Null)
            | (Self::Mixed, _)
            | (Self::Boolean, Value::Bool(_))
            | (Self::Number, Value::Number(_))
            | (Self::String | Self::Json, Value::String(_)) => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Json => "json",
            Self::Mixed => "mixed",
        }
    }
}

/// Display name keyed by language code (`en`, `de`, `zh-cn`, …).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Start from the fallback-language text.
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(FALLBACK_LANGUAGE.to_string(), fallback.into());
        Self(map)
    }

    #[must_use]
    pub fn with(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(language.into(), text.into());
        self
    }

    /// Translation for `language`, falling back to [`FALLBACK_LANGUAGE`].
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0
            .get(language)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .map(String::as_str)
    }
}

/// Metadata shared by every object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectCommon {
    pub name: LocalizedText,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub role: String,
    pub read: bool,
    pub write: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def: Option<serde_json::Value>,
}

/// An object as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub common: ObjectCommon,
    #[serde(default)]
    pub native: serde_json::Map<String, serde_json::Value>,
}

impl StoredObject {
    /// A `state` object with an empty native section.
    #[must_use]
    pub fn state(common: ObjectCommon) -> Self {
        Self {
            object_type: ObjectType::State,
            common,
            native: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_native(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.native.insert(key.into(), value);
        self
    }
}
