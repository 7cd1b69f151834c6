//! Unified error handling.
//!
//! Provides a single `AppError` that subsystem errors convert into, plus the
//! shopper-facing message mapping. Fallible store operations return
//! `Result<T, AppError>` at the application boundary.

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::cart::CartError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart mutation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Account or order operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Backend API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Message suitable for display to the shopper.
    ///
    /// Internal detail (URLs, timings, config) stays out of the message;
    /// business-rule errors pass through as-is.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cart(err) => err.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidEmail => {
                    "Email or password is incorrect".to_string()
                }
                AuthError::EmailTaken => "An account with this email already exists".to_string(),
                AuthError::NotSignedIn => "Please sign in first".to_string(),
                AuthError::Validation(_) => err.to_string(),
            },
            Self::Api(err) if err.is_timeout() => {
                "The server is taking too long to respond, please try again".to_string()
            }
            Self::Api(_) => "Unable to reach the server, please try again".to_string(),
            Self::Config(_) => "The application is misconfigured".to_string(),
            Self::NotFound(what) => format!("{what} was not found"),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
