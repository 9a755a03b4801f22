//! Schedule API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{Entity, RepoError, restaurant, schedule};
use crate::utils::AppResult;
use shared::models::{
    Schedule, ScheduleCreate, ScheduleDeletion, ScheduleQuery, ScheduleRetire, ScheduleUpdate,
};

/// GET /api/restaurants/{id}/schedules?date=YYYY-MM-DD
pub async fn list_by_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<Vec<Schedule>>> {
    restaurant::find_by_id(&state.db.pool, restaurant_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Restaurant, restaurant_id.to_string()))?;
    let schedules =
        schedule::find_by_restaurant(&state.db.pool, restaurant_id, query.date.as_deref()).await?;
    Ok(Json(schedules))
}

/// POST /api/restaurants/{id}/schedules
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<ScheduleCreate>,
) -> AppResult<Json<Schedule>> {
    let schedule = schedule::create(&state.db.pool, restaurant_id, payload).await?;
    Ok(Json(schedule))
}

/// GET /api/schedules/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Schedule>> {
    let schedule = schedule::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Schedule, id.to_string()))?;
    Ok(Json(schedule))
}

/// PUT /api/schedules/{id} - date, time, capacity or status; requires the current version
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleUpdate>,
) -> AppResult<Json<Schedule>> {
    let schedule = schedule::update(&state.db.pool, id, payload).await?;
    Ok(Json(schedule))
}

/// POST /api/schedules/{id}/retire - stop taking bookings
pub async fn retire(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleRetire>,
) -> AppResult<Json<Schedule>> {
    let schedule = schedule::retire(&state.db.pool, id, &payload.version).await?;
    Ok(Json(schedule))
}

/// DELETE /api/schedules/{id} - deletes, or retires when bookings exist
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ScheduleDeletion>> {
    let outcome = schedule::delete(&state.db.pool, id).await?;
    Ok(Json(outcome))
}
