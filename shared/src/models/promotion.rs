//! Promotion Model

use serde::{Deserialize, Serialize};

use crate::version::VersionToken;

/// Percentage discount a restaurant runs over a date range (inclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Promotion {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 1..=100
    pub discount_percent: i32,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD, never before `start_date`
    pub end_date: String,
    pub version: VersionToken,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create promotion payload (restaurant comes from the path)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCreate {
    pub name: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub start_date: String,
    pub end_date: String,
}

/// Update promotion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub discount_percent: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub version: VersionToken,
}
