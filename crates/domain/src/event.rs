//! Change events — notifications emitted for every mutation in the store.
//!
//! Events carry fully qualified ids and are published for the whole store,
//! so every consumer filters for the slice it cares about.

use serde::{Deserialize, Serialize};

use crate::object::StoredObject;
use crate::path::ObjectId;
use crate::state::State;

/// One mutation in the store. A `None` payload means the item was deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    StateChanged {
        id: ObjectId,
        state: Option<State>,
    },
    ObjectChanged {
        id: ObjectId,
        object: Option<StoredObject>,
    },
}

impl ChangeEvent {
    /// Fully qualified id of the changed item.
    #[must_use]
    pub fn id(&self) -> &ObjectId {
        match self {
            Self::StateChanged { id, .. } | Self::ObjectChanged { id, .. } => id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::StateChanged { .. } => ChangeKind::State,
            Self::ObjectChanged { .. } => ChangeKind::Object,
        }
    }
}

/// Discriminant of [`ChangeEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    State,
    Object,
}
