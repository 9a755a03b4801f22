//! Restaurant Model

use serde::{Deserialize, Serialize};

use crate::version::VersionToken;

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub version: VersionToken,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub category_id: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// Update restaurant payload
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub version: VersionToken,
}

/// Query filter for restaurant listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantQuery {
    pub category_id: Option<i64>,
}
