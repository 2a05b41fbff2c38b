//! JSON REST handlers for stored objects.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use pixelhub_app::ports::ObjectStore;
use pixelhub_domain::error::{NotFoundError, PixelHubError};
use pixelhub_domain::object::StoredObject;
use pixelhub_domain::path::ObjectId;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    /// Only objects at or below this dotted prefix.
    #[serde(default)]
    pub prefix: String,
}

/// One object together with its id.
#[derive(Serialize)]
pub struct ObjectEntry {
    pub id: ObjectId,
    #[serde(flatten)]
    pub object: StoredObject,
}

/// `GET /api/objects?prefix=apps`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ObjectEntry>>, ApiError>
where
    S: ObjectStore + 'static,
{
    let objects = state.store.list_objects(&query.prefix).await?;
    let entries = objects
        .into_iter()
        .map(|(id, object)| ObjectEntry { id, object })
        .collect();
    Ok(Json(entries))
}

/// `GET /api/objects/{id}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<StoredObject>, ApiError>
where
    S: ObjectStore + 'static,
{
    let id = ObjectId::new(id)?;
    let object = state.store.get_object(&id).await?.ok_or_else(|| {
        PixelHubError::from(NotFoundError {
            kind: "Object",
            id: id.to_string(),
        })
    })?;
    Ok(Json(object))
}
