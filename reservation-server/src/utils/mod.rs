//! Utility module
//!
//! - [`AppError`] - application error type (from shared::error)
//! - logging setup and input validation

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
