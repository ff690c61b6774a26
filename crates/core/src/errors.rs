//! Core error types for the Sayho client.
//!
//! HTTP transport errors are converted by `sayho-connect`, which owns the
//! client. File I/O only happens in token stores and maps to `TokenStore`.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the client.
///
/// Malformed amounts have no variant here; the aggregator counts them as zero.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend rejected the credential exchange.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account creation was rejected (e.g. duplicate email).
    #[error("Account creation failed: {0}")]
    AccountCreationFailed(String),

    /// An authenticated call was rejected; the session has been cleared.
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// Timeout, connection failure, non-success status or malformed body.
    #[error("Request failed: {0}")]
    NetworkOrServer(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the error means the stored credential is no longer usable.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::SessionExpired | Error::InvalidCredentials)
    }
}

/// Validation errors for user input checked before it reaches the backend.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::TokenStore(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::NetworkOrServer(format!("Malformed response body: {}", err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
