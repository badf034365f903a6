// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports and retries keep copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Request Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("invalid project name '{name}': {reason}")]
    NameValidation { name: String, reason: String },

    #[error("unknown option '{option}'")]
    UnknownOption { option: String },

    #[error("invalid value '{value}' for option '{option}' (allowed: {})", allowed.join(", "))]
    InvalidOptionValue {
        option: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("invalid value '{value}' for option '{option}': {reason}")]
    InvalidTextValue {
        option: String,
        value: String,
        reason: String,
    },

    // ========================================================================
    // Template / Schema Errors (bad template definitions)
    // ========================================================================
    #[error("Invalid option schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has no content")]
    EmptyTemplate { template_id: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Rendering '{path}' failed: {reason}")]
    RenderFailed { path: String, reason: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NameValidation { name, .. } => vec![
                format!("'{}' is not a valid project name", name),
                "Start with a letter; use only letters, digits and hyphens".into(),
                "Examples: my-project, MyTool, data-pipeline2".into(),
            ],
            Self::UnknownOption { option } => vec![
                format!("'{}' is not an option of this template", option),
                "Try: pyscaff options".into(),
            ],
            Self::InvalidOptionValue {
                option, allowed, ..
            } => vec![
                format!("Allowed values for '{}':", option),
                format!("  {}", allowed.join(" | ")),
            ],
            Self::InvalidTextValue { option, .. } => vec![
                format!("'{}' is written into TOML and YAML files verbatim", option),
                "Drop double quotes, backslashes and control characters".into(),
            ],
            Self::InvalidSchema(msg) | Self::InvalidTemplate(msg) => vec![
                "The template definition is inconsistent".into(),
                format!("Details: {}", msg),
            ],
            Self::EmptyTemplate { template_id } => vec![
                format!("Template '{}' is corrupted", template_id),
                "Please report this issue or use a different template directory".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NameValidation { .. }
            | Self::UnknownOption { .. }
            | Self::InvalidOptionValue { .. }
            | Self::InvalidTextValue { .. } => ErrorCategory::Validation,
            Self::InvalidSchema(_)
            | Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::RenderFailed { .. } => ErrorCategory::Template,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` for an unknown option key or an unacceptable value.
    pub fn is_invalid_option(&self) -> bool {
        matches!(
            self,
            Self::UnknownOption { .. }
                | Self::InvalidOptionValue { .. }
                | Self::InvalidTextValue { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    Internal,
}
