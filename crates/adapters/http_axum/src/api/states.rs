//! JSON REST handlers for state values.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pixelhub_app::ports::ObjectStore;
use pixelhub_domain::error::{NotFoundError, PixelHubError};
use pixelhub_domain::path::ObjectId;
use pixelhub_domain::state::State as ObjectState;

use crate::error::ApiError;
use crate::state::AppState;

/// Source marker attached to writes coming through the API.
pub const API_SOURCE: &str = "pixelhub.http";

/// Request body for writing a state.
#[derive(Deserialize)]
pub struct UpdateStateRequest {
    pub val: serde_json::Value,
    /// Writes are requests unless explicitly marked as confirmed.
    #[serde(default)]
    pub ack: bool,
}

/// `GET /api/states/{id}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<ObjectState>, ApiError>
where
    S: ObjectStore + 'static,
{
    let id = ObjectId::new(id)?;
    let current = state.store.get_state(&id).await?.ok_or_else(|| {
        PixelHubError::from(NotFoundError {
            kind: "State",
            id: id.to_string(),
        })
    })?;
    Ok(Json(current))
}

/// `PUT /api/states/{id}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStateRequest>,
) -> Result<Json<ObjectState>, ApiError>
where
    S: ObjectStore + 'static,
{
    let id = ObjectId::new(id)?;
    let written = if req.ack {
        ObjectState::acknowledged(req.val)
    } else {
        ObjectState::request(req.val)
    }
    .with_source(API_SOURCE);

    state.store.set_state(&id, written.clone()).await?;
    tracing::debug!(id = %id, ack = written.ack, "state written through API");
    Ok(Json(written))
}
