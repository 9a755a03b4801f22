//! Promotion API
//!
//! Listing and creation live under `/api/restaurants/{id}/promotions`.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub(crate) use handler::{create, list_by_restaurant};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/promotions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route(
        "/{id}",
        get(handler::get_by_id)
            .put(handler::update)
            .delete(handler::delete),
    )
}
