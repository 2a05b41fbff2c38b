//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod objects;
#[allow(clippy::missing_errors_doc)]
pub mod states;

use axum::Router;
use axum::routing::get;

use pixelhub_app::ports::ObjectStore;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: ObjectStore + 'static,
{
    Router::new()
        // Objects
        .route("/objects", get(objects::list::<S>))
        .route("/objects/{id}", get(objects::get::<S>))
        // States
        .route(
            "/states/{id}",
            get(states::get::<S>).put(states::update::<S>),
        )
}
