//! CLI errors: what went wrong, what to try next, and which exit code.

use std::error::Error as _;
use std::fmt::Write as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use pyscaff_core::error::{ErrorCategory as CoreCategory, PyscaffError};

pub type CliResult<T> = Result<T, CliError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Input clap accepted but the command could not use.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Raised by the scaffold, template or verification services.
    #[error("{0}")]
    Core(#[from] PyscaffError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// The binary was built without the named cargo feature.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },

    #[error("{root} failed {} rule(s): {}", failed.len(), failed.join(", "))]
    VerificationFailed { root: PathBuf, failed: Vec<String> },

    #[error("`make check` failed in {root}{}", status.map(|s| format!(" (exit status {s})")).unwrap_or_default())]
    CheckFailed { root: PathBuf, status: Option<i32> },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// How a failure is classified for exit codes and log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    /// The tree on disk does not match its options.
    Verification,
    Internal,
}

impl ErrorCategory {
    /// | Category      | Code |
    /// |---------------|------|
    /// | Internal      |  1   |
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Verification  |  5   |
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Internal => 1,
            Self::UserError => 2,
            Self::NotFound => 3,
            Self::Configuration => 4,
            Self::Verification => 5,
        }
    }
}

impl From<CoreCategory> for ErrorCategory {
    fn from(category: CoreCategory) -> Self {
        match category {
            CoreCategory::Validation => Self::UserError,
            CoreCategory::NotFound => Self::NotFound,
            CoreCategory::Configuration => Self::Configuration,
            CoreCategory::Internal => Self::Internal,
        }
    }
}

impl CliError {
    /// Wrap a configuration bootstrap failure.
    pub fn config(err: anyhow::Error) -> Self {
        CliError::ConfigError {
            message: format!("{err:#}"),
            source: Some(err.into()),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run 'pyscaff <command> --help' for usage".into()],

            Self::ConfigError { .. } => vec![
                "Check the file printed by 'pyscaff config path'".into(),
                "Environment overrides look like PYSCAFF_DEFAULTS__LAYOUT=flat".into(),
                "Use 'pyscaff init --force' to reset to defaults".into(),
            ],

            Self::Core(core) => {
                let mut suggestions = core.suggestions();
                if core.is_invalid_option() {
                    suggestions.push("List valid options with: pyscaff options".into());
                }
                suggestions
            }

            Self::IoError { .. } => vec![
                "Check permissions on the output directory".into(),
                "Pick another location with --output-dir".into(),
            ],

            Self::Cancelled => vec!["Nothing was written".into()],

            Self::FeatureNotAvailable { feature } => vec![
                format!("Reinstall with: cargo install pyscaff-cli --features {feature}"),
                "Pass options with -o KEY=VALUE instead".into(),
            ],

            Self::VerificationFailed { .. } => vec![
                "Pass the options the project was generated with (-o KEY=VALUE)".into(),
                "Re-run with --output-format json for every failed expectation".into(),
            ],

            Self::CheckFailed { root, .. } => vec![
                format!("Run 'make check' in {} to see the full output", root.display()),
                "Run 'make install' first if the environment is missing".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Core(core) => core.category().into(),
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::VerificationFailed { .. } | Self::CheckFailed { .. } => {
                ErrorCategory::Verification
            }
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Error text for stderr. `verbose` adds the cause chain; `colored`
    /// adds ANSI styling.
    pub fn render(&self, verbose: bool, colored: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if colored { style(text) } else { text.to_string() }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n{} {}",
            paint("Error:", |t| t.red().bold().to_string()),
            paint(&self.to_string(), |t| t.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let line = format!("Caused by: {err}");
                let _ = writeln!(out, "  {}", paint(&line, |t| t.dimmed().to_string()));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(out, "\n{}", paint("Suggestions:", |t| t.yellow().bold().to_string()));
            for suggestion in &suggestions {
                let _ = writeln!(out, "  {suggestion}");
            }
        }

        if !verbose {
            let hint = "Use -v / --verbose for more details.";
            let _ = writeln!(out, "\n{}", paint(hint, |t| t.dimmed().to_string()));
        }

        out
    }

    /// Record the failure in the log before it is printed.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound | ErrorCategory::Verification => {
                tracing::warn!(category = ?self.category(), "{self}");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(category = ?self.category(), "{self}");
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "caused by");
        }
    }
}

/// Attach a context message when turning an I/O failure into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscaff_core::{application::ApplicationError, domain::DomainError};
    use std::io;

    fn core(err: impl Into<PyscaffError>) -> CliError {
        CliError::Core(err.into())
    }

    #[test]
    fn project_exists_suggests_force() {
        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/test"),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_option_points_at_options_command() {
        let err = core(DomainError::UnknownOption {
            option: "colour".into(),
        });
        assert!(
            err.suggestions()
                .iter()
                .any(|s| s.contains("pyscaff options"))
        );
    }

    #[test]
    fn invalid_name_is_a_user_error() {
        let err = core(DomainError::NameValidation {
            name: "my_project".into(),
            reason: "'_' is not allowed".into(),
        });
        assert!(!err.suggestions().is_empty());
        assert!(err.to_string().contains("my_project"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn exit_codes_by_category() {
        let not_found = core(ApplicationError::TemplateNotFound {
            location: "/nowhere".into(),
        });
        assert_eq!(not_found.exit_code(), 3);

        let config = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert_eq!(config.exit_code(), 4);

        let io = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("e"),
        };
        assert_eq!(io.exit_code(), 1);

        assert_eq!(CliError::Cancelled.exit_code(), 2);
    }

    #[test]
    fn verification_failures_exit_with_five() {
        let err = CliError::VerificationFailed {
            root: PathBuf::from("my-lib"),
            failed: vec!["docs".into(), "deptry".into()],
        };
        assert_eq!(err.exit_code(), 5);
        assert_eq!(err.to_string(), "my-lib failed 2 rule(s): docs, deptry");

        let check = CliError::CheckFailed {
            root: PathBuf::from("x"),
            status: Some(2),
        };
        assert_eq!(check.exit_code(), 5);
        assert_eq!(check.to_string(), "`make check` failed in x (exit status 2)");
    }

    #[test]
    fn plain_render_has_no_ansi() {
        let err = core(ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/x"),
        });
        let text = err.render(false, false);
        assert!(text.contains("Error: Project already exists at /tmp/x"));
        assert!(text.contains("Suggestions:"));
        assert!(text.contains("--verbose"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn verbose_render_shows_cause() {
        let err = CliError::config(anyhow::anyhow!("bad toml"));
        let text = err.render(true, false);
        assert!(text.contains("Caused by: bad toml"));
        assert!(!text.contains("--verbose"));
    }

    #[test]
    fn colored_render_styles_header() {
        let text = CliError::Cancelled.render(false, true);
        assert!(text.contains('\u{1b}'));
    }

    #[test]
    fn io_context_is_attached() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let err = result.with_cli_context(|| "reading config").unwrap_err();
        assert_eq!(err.to_string(), "I/O error: reading config");
    }
}
