//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{Entity, RepoError, category};
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_name, validate_required_text};
use crate::utils::AppResult;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

/// GET /api/categories - list all categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.db.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Category, id.to_string()))?;
    Ok(Json(category))
}

/// POST /api/categories - create a category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let category = category::create(&state.db.pool, payload).await?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/{id} - rename, requires the current version
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    validate_optional_name(&payload.name, "name")?;

    let category = category::update(&state.db.pool, id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - refused while restaurants reference it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    category::delete(&state.db.pool, id).await?;
    tracing::info!(category_id = id, "Category deleted");
    Ok(Json(true))
}
