//! Error types for the transition-authorization engine

use thiserror::Error;

/// Transition-authorization errors.
///
/// Only construction-time shape errors and redirect-resolution failures are
/// errors. A rejected privilege is a [`Denial`](crate::types::Denial) value
/// returned by the engine, never an error.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Malformed access policy detected at rule-set construction
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// No redirect target could be produced for a rejected privilege
    #[error("No redirect available: {0}")]
    NoRedirect(String),
}

/// Result type for transition-authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
