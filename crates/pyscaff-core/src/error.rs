//! Unified error handling for pyscaff Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for pyscaff Core operations.
///
/// This enum wraps all possible errors that can occur when using pyscaff-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum PyscaffError {
    /// Errors from the domain layer (option, name and template violations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl PyscaffError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in pyscaff".into(),
                "Please report this issue at: https://github.com/cosecruz/pyscaff/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Template => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` when the project name failed the identifier rule.
    pub fn is_name_validation(&self) -> bool {
        matches!(self, Self::Domain(DomainError::NameValidation { .. }))
    }

    /// `true` for an unknown option key or an out-of-domain option value.
    pub fn is_invalid_option(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_invalid_option())
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type PyscaffResult<T> = Result<T, PyscaffError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> PyscaffResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> PyscaffResult<T> {
        self.map_err(|e| PyscaffError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
