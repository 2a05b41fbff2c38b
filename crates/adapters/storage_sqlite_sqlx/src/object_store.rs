//! `SQLite` implementation of [`ObjectStore`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use pixelhub_app::ports::{EventPublisher, ObjectStore};
use pixelhub_domain::error::{NotFoundError, PixelHubError, ValidationError};
use pixelhub_domain::event::ChangeEvent;
use pixelhub_domain::object::StoredObject;
use pixelhub_domain::path::{Namespace, ObjectId};
use pixelhub_domain::state::State;
use pixelhub_domain::time;

use crate::error::StorageError;

/// Row wrapper so domain structs stay free of database concerns.
struct ObjectRow(ObjectId, StoredObject);

impl<'r> FromRow<'r, SqliteRow> for ObjectRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let object_json: String = row.try_get("object")?;

        let id = ObjectId::new(id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let object: StoredObject = serde_json::from_str(&object_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(id, object))
    }
}

struct StateRow(State);

impl<'r> FromRow<'r, SqliteRow> for StateRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let val_json: String = row.try_get("val")?;
        let ack: bool = row.try_get("ack")?;
        let source: Option<String> = row.try_get("source")?;
        let ts_str: String = row.try_get("ts")?;

        let val = serde_json::from_str(&val_json).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let ts = time::from_storage(&ts_str).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(State {
            val,
            ack,
            source,
            ts,
        }))
    }
}

const INSERT_OBJECT_IF_ABSENT: &str =
    "INSERT INTO objects (id, object) VALUES (?, ?) ON CONFLICT (id) DO NOTHING";
const SELECT_OBJECT: &str = "SELECT id, object FROM objects WHERE id = ?";
const SELECT_ALL_OBJECTS: &str = "SELECT id, object FROM objects ORDER BY id";
const SELECT_OBJECTS_BELOW: &str =
    r"SELECT id, object FROM objects WHERE id = ? OR id LIKE ? ESCAPE '\' ORDER BY id";
const DELETE_OBJECT: &str = "DELETE FROM objects WHERE id = ?";

const UPSERT_STATE: &str = r"
    INSERT INTO states (id, val, ack, source, ts) VALUES (?, ?, ?, ?, ?)
    ON CONFLICT (id) DO UPDATE
    SET val = excluded.val, ack = excluded.ack, source = excluded.source, ts = excluded.ts
";
const SELECT_STATE: &str = "SELECT val, ack, source, ts FROM states WHERE id = ?";
const DELETE_STATE: &str = "DELETE FROM states WHERE id = ?";

/// `SQLite`-backed object store publishing every mutation through `P`.
pub struct SqliteObjectStore<P> {
    pool: SqlitePool,
    namespace: Namespace,
    publisher: P,
}

impl<P: EventPublisher + Send + Sync> SqliteObjectStore<P> {
    /// Create a new store for `namespace` using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool, namespace: Namespace, publisher: P) -> Self {
        Self {
            pool,
            namespace,
            publisher,
        }
    }

    async fn fetch_object(&self, id: &ObjectId) -> Result<Option<StoredObject>, PixelHubError> {
        let row: Option<ObjectRow> = sqlx::query_as(SELECT_OBJECT)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|ObjectRow(_, object)| object))
    }

    async fn write_state(&self, id: &ObjectId, state: State) -> Result<(), PixelHubError> {
        let val_json = serde_json::to_string(&state.val).map_err(StorageError::from)?;

        sqlx::query(UPSERT_STATE)
            .bind(id.as_str())
            .bind(&val_json)
            .bind(state.ack)
            .bind(state.source.as_deref())
            .bind(time::to_storage(state.ts))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        self.publisher
            .publish(ChangeEvent::StateChanged {
                id: self.namespace.qualify(id)?,
                state: Some(state),
            })
            .await
    }
}

impl<P: EventPublisher + Send + Sync> ObjectStore for SqliteObjectStore<P> {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn set_object_not_exists(
        &self,
        id: &ObjectId,
        object: StoredObject,
    ) -> Result<bool, PixelHubError> {
        let object_json = serde_json::to_string(&object).map_err(StorageError::from)?;

        let inserted = sqlx::query(INSERT_OBJECT_IF_ABSENT)
            .bind(id.as_str())
            .bind(&object_json)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?
            .rows_affected()
            > 0;
        if !inserted {
            return Ok(false);
        }

        let default = object.common.def.clone();
        self.publisher
            .publish(ChangeEvent::ObjectChanged {
                id: self.namespace.qualify(id)?,
                object: Some(object),
            })
            .await?;

        if let Some(default) = default {
            self.write_state(id, State::acknowledged(default)).await?;
        }
        tracing::debug!(id = %id, "object created");
        Ok(true)
    }

    async fn get_object(&self, id: &ObjectId) -> Result<Option<StoredObject>, PixelHubError> {
        self.fetch_object(id).await
    }

    async fn list_objects(
        &self,
        prefix: &str,
    ) -> Result<Vec<(ObjectId, StoredObject)>, PixelHubError> {
        let rows: Vec<ObjectRow> = if prefix.is_empty() {
            sqlx::query_as(SELECT_ALL_OBJECTS)
                .fetch_all(&self.pool)
                .await
        } else {
            sqlx::query_as(SELECT_OBJECTS_BELOW)
                .bind(prefix)
                .bind(format!("{}.%", escape_like(prefix)))
                .fetch_all(&self.pool)
                .await
        }
        .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|ObjectRow(id, obj)| (id, obj)).collect())
    }

    async fn delete_object(&self, id: &ObjectId) -> Result<(), PixelHubError> {
        sqlx::query(DELETE_STATE)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let deleted = sqlx::query(DELETE_OBJECT)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?
            .rows_affected()
            > 0;
        if !deleted {
            return Ok(());
        }

        let full = self.namespace.qualify(id)?;
        self.publisher
            .publish(ChangeEvent::StateChanged {
                id: full.clone(),
                state: None,
            })
            .await?;
        self.publisher
            .publish(ChangeEvent::ObjectChanged {
                id: full,
                object: None,
            })
            .await
    }

    async fn get_state(&self, id: &ObjectId) -> Result<Option<State>, PixelHubError> {
        let row: Option<StateRow> = sqlx::query_as(SELECT_STATE)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|StateRow(state)| state))
    }

    async fn set_state(&self, id: &ObjectId, state: State) -> Result<(), PixelHubError> {
        let object = self.fetch_object(id).await?.ok_or_else(|| NotFoundError {
            kind: "Object",
            id: id.to_string(),
        })?;

        let expected = object.common.value_type;
        if !expected.accepts(&state.val) {
            return Err(ValidationError::InvalidStateValue {
                expected: expected.as_str(),
            }
            .into());
        }

        self.write_state(id, state).await
    }
}

/// Escape `LIKE` wildcards so a prefix matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
