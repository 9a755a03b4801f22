//! Promotion API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{Entity, RepoError, promotion, restaurant};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_name, validate_optional_text,
    validate_required_text,
};
use crate::utils::AppResult;
use shared::models::{Promotion, PromotionCreate, PromotionUpdate};

/// GET /api/restaurants/{id}/promotions
pub async fn list_by_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<Vec<Promotion>>> {
    restaurant::find_by_id(&state.db.pool, restaurant_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Restaurant, restaurant_id.to_string()))?;
    let promotions = promotion::find_by_restaurant(&state.db.pool, restaurant_id).await?;
    Ok(Json(promotions))
}

/// POST /api/restaurants/{id}/promotions
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<PromotionCreate>,
) -> AppResult<Json<Promotion>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let promotion = promotion::create(&state.db.pool, restaurant_id, payload).await?;
    tracing::info!(promotion_id = promotion.id, restaurant_id, name = %promotion.name, "Promotion created");
    Ok(Json(promotion))
}

/// GET /api/promotions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Promotion>> {
    let promotion = promotion::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Promotion, id.to_string()))?;
    Ok(Json(promotion))
}

/// PUT /api/promotions/{id} - requires the current version
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PromotionUpdate>,
) -> AppResult<Json<Promotion>> {
    validate_optional_name(&payload.name, "name")?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let promotion = promotion::update(&state.db.pool, id, payload).await?;
    Ok(Json(promotion))
}

/// DELETE /api/promotions/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    promotion::delete(&state.db.pool, id).await?;
    tracing::info!(promotion_id = id, "Promotion deleted");
    Ok(Json(true))
}
