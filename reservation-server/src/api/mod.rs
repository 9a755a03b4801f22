//! HTTP API
//!
//! One module per resource, each exposing `router()`. Handlers return plain
//! entity JSON on success and an `ApiResponse` error body on failure.

pub mod bookings;
pub mod categories;
pub mod health;
pub mod promotions;
pub mod restaurants;
pub mod schedules;
