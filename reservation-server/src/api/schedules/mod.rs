//! Schedule API
//!
//! Listing and creation live under `/api/restaurants/{id}/schedules`.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub(crate) use handler::{create, list_by_restaurant};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/schedules", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/retire", post(handler::retire))
}
