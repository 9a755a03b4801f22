//! Data models
//!
//! Shared between the reservation server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod booking;
pub mod category;
pub mod promotion;
pub mod restaurant;
pub mod schedule;

// Re-exports
pub use booking::*;
pub use category::*;
pub use promotion::*;
pub use restaurant::*;
pub use schedule::*;
