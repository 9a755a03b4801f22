//! Reservation Server - restaurant reservation backend
//!
//! # Module layout
//!
//! ```text
//! reservation-server/src/
//! ├── core/       # config, state, errors, background tasks
//! ├── db/         # SQLite pool, version guard, seat ledger, repositories
//! ├── services/   # booking service, expiry scheduler, router assembly
//! ├── mail/       # mail queue, worker, transports
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # error conversion, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod mail;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use db::DbService;
pub use services::https::build_router;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};
