use thiserror::Error;

use crate::mail::MailError;
use crate::utils::AppError;

/// Startup and serving failures
///
/// Request-level failures use [`AppError`]; this covers what can stop the
/// server itself.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] AppError),

    #[error("Mail setup failed: {0}")]
    Mail(#[from] MailError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
