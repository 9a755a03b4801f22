//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{Entity, RepoError};
use crate::utils::validation::{MAX_NAME_LEN, validate_email, validate_required_text};
use crate::utils::AppResult;
use shared::models::{Booking, BookingCreate, BookingQuery};

/// POST /api/bookings - reserve seats on a schedule
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    validate_required_text(&payload.contact_name, "contact_name", MAX_NAME_LEN)?;
    validate_email(&payload.contact_email, "contact_email")?;

    let booking = state.bookings.create(payload).await?;
    Ok(Json(booking))
}

/// GET /api/bookings?user_id= - bookings of one user
pub async fn list_by_user(
    State(state): State<ServerState>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.bookings.list_by_user(query.user_id).await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .bookings
        .get(id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Booking, id.to_string()))?;
    Ok(Json(booking))
}

/// GET /api/bookings/number/{booking_no}
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(booking_no): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .bookings
        .get_by_number(&booking_no)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Booking, booking_no.clone()))?;
    Ok(Json(booking))
}

/// POST /api/bookings/{id}/complete - PENDING to COMPLETE
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.complete(id).await?;
    Ok(Json(booking))
}
