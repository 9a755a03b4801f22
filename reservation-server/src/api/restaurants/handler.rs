//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{Entity, RepoError, restaurant};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_name,
    validate_optional_text, validate_required_text,
};
use crate::utils::AppResult;
use shared::models::{Restaurant, RestaurantCreate, RestaurantQuery, RestaurantUpdate};

/// GET /api/restaurants?category_id= - list restaurants
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantQuery>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = restaurant::find_all(&state.db.pool, query.category_id).await?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = restaurant::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Restaurant, id.to_string()))?;
    Ok(Json(restaurant))
}

/// POST /api/restaurants
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let restaurant = restaurant::create(&state.db.pool, payload).await?;
    tracing::info!(restaurant_id = restaurant.id, name = %restaurant.name, "Restaurant created");
    Ok(Json(restaurant))
}

/// PUT /api/restaurants/{id} - partial update, requires the current version
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    validate_optional_name(&payload.name, "name")?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let restaurant = restaurant::update(&state.db.pool, id, payload).await?;
    Ok(Json(restaurant))
}

/// DELETE /api/restaurants/{id} - refused while schedules exist
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    restaurant::delete(&state.db.pool, id).await?;
    tracing::info!(restaurant_id = id, "Restaurant deleted");
    Ok(Json(true))
}
