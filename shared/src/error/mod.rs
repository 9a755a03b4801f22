//! Unified error system for the reservation platform
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Restaurant errors
//! - 2xxx: Category errors
//! - 3xxx: Promotion errors
//! - 4xxx: Schedule errors
//! - 5xxx: Booking errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::InsufficientSeats)
//!     .with_detail("requested", 20)
//!     .with_detail("available", 15);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(5002));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
