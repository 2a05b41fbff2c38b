//! State — the current value of a state object plus its acknowledgment flag.

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// Value of a state object at one point in time.
///
/// `ack == false` marks a pending request (typically written by a user or an
/// external tool); `ack == true` marks a value confirmed as applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub val: serde_json::Value,
    pub ack: bool,
    /// Marker identifying the writer, used to tell own writes apart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub ts: Timestamp,
}

impl State {
    /// An unacknowledged request for `val`.
    #[must_use]
    pub fn request(val: serde_json::Value) -> Self {
        Self {
            val,
            ack: false,
            source: None,
            ts: now(),
        }
    }

    /// A confirmed value.
    #[must_use]
    pub fn acknowledged(val: serde_json::Value) -> Self {
        Self {
            ack: true,
            ..Self::request(val)
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
