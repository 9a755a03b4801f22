//! Booking API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_by_user).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/number/{booking_no}", get(handler::get_by_number))
        .route("/{id}/complete", post(handler::complete))
}
