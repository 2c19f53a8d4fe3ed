//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Only validation failures change the HTTP status seen by the dashboard.
/// Template and data-access failures are reported inside the response body
/// with `sucesso: false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// A required filter is missing.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A named SQL template does not exist.
    #[error("SQL template not found: {0}")]
    TemplateNotFound(String),

    /// The database or statement binding failed.
    #[error("Data access error: {0}")]
    DataAccess(String),
}

impl AppError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a data access error.
    #[must_use]
    pub fn data_access(msg: impl Into<String>) -> Self {
        Self::DataAccess(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::TemplateNotFound(_) | Self::DataAccess(_) => 200,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::DataAccess(_) => "DATA_ACCESS_ERROR",
        }
    }

    /// Returns the bare message, without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::TemplateNotFound(msg) | Self::DataAccess(msg) => msg,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
