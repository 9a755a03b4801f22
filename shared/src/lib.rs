//! Shared types for the reservation platform
//!
//! Domain models, version tokens, the unified error system and small
//! utilities used by the server and its clients.

pub mod error;
pub mod models;
pub mod util;
pub mod version;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use version::VersionToken;
