//! Restaurant API
//!
//! Also serves the restaurant-scoped promotion and schedule collections.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/promotions",
            get(crate::api::promotions::list_by_restaurant)
                .post(crate::api::promotions::create),
        )
        .route(
            "/{id}/schedules",
            get(crate::api::schedules::list_by_restaurant)
                .post(crate::api::schedules::create),
        )
}
