//! Dotted object identifiers and the store namespace they live under.
//!
//! Ids travel in two shapes: fully qualified (`pixelhub.0.apps.Weather.visible`)
//! as carried by change events, and namespace-relative (`apps.Weather.visible`)
//! as accepted by store operations. [`Namespace`] converts between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PixelHubError, ValidationError};

const SEPARATOR: char = '.';

/// A dotted path addressing an object in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Validate and wrap a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPath`] for an empty string and
    /// [`ValidationError::EmptyPathSegment`] when two separators touch or the
    /// path starts/ends with a separator.
    pub fn new(path: impl Into<String>) -> Result<Self, PixelHubError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ValidationError::EmptyPath.into());
        }
        if path.split(SEPARATOR).any(str::is_empty) {
            return Err(ValidationError::EmptyPathSegment(path).into());
        }
        Ok(Self(path))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append one or more segments (`"a.b"` joined with `"c"` gives `"a.b.c"`).
    ///
    /// # Errors
    ///
    /// Returns a validation error if `segment` is empty or malformed.
    pub fn join(&self, segment: &str) -> Result<Self, PixelHubError> {
        Self::new(format!("{}{SEPARATOR}{segment}", self.0))
    }

    /// Whether this id equals `prefix` or lies below it.
    ///
    /// Matching is segment-aware: `apps` covers `apps.Clock` but not `appsx`.
    #[must_use]
    pub fn is_within(&self, prefix: &str) -> bool {
        match self.0.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
            None => false,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = PixelHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = PixelHubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl PartialEq<str> for ObjectId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ObjectId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Instance prefix owned by one adapter inside the shared store (e.g. `pixelhub.0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(ObjectId);

impl Namespace {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyNamespace`] for an empty string, or a
    /// path validation error for malformed input.
    pub fn new(namespace: impl Into<String>) -> Result<Self, PixelHubError> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(ValidationError::EmptyNamespace.into());
        }
        ObjectId::new(namespace).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Turn a namespace-relative id into a fully qualified one.
    ///
    /// # Errors
    ///
    /// Never fails for a valid `relative`; the `Result` mirrors [`ObjectId::join`].
    pub fn qualify(&self, relative: &ObjectId) -> Result<ObjectId, PixelHubError> {
        self.0.join(relative.as_str())
    }

    /// Strip this namespace from a fully qualified id.
    ///
    /// Ids from a foreign namespace are returned unchanged.
    #[must_use]
    pub fn strip<'a>(&self, id: &'a ObjectId) -> &'a str {
        id.as_str()
            .strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .unwrap_or(id.as_str())
    }

    /// Whether a fully qualified id belongs to this namespace.
    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        id.is_within(self.as_str()) && id.as_str() != self.as_str()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for Namespace {
    type Error = PixelHubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0.into()
    }
}
