//! Read-only inspection of a generated project on disk.
//!
//! [`GeneratedProject`] implements the `ArtifactInspector` port for a
//! directory, so the generation contract can be verified against what was
//! actually written. It can also run the project's own `make check`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use pyscaff_core::{
    application::{ApplicationError, ports::ArtifactInspector},
    error::{PyscaffError, PyscaffResult},
};

/// A generated project rooted at a directory.
#[derive(Debug, Clone)]
pub struct GeneratedProject {
    root: PathBuf,
}

/// Result of running a command inside a generated project.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub success: bool,
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    /// Captured stdout followed by stderr.
    pub output: String,
}

impl GeneratedProject {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every regular file below the root, relative and sorted.
    pub fn files(&self) -> PyscaffResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.root.clone(),
                reason: format!("Failed to walk directory: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                files.push(rel.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Run `make check` in the project.
    ///
    /// A failing check is an `Ok` outcome with `success == false`; only a
    /// command that cannot be started is an error.
    pub fn run_check(&self) -> PyscaffResult<CheckOutcome> {
        self.run_make("check")
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn run_make(&self, target: &str) -> PyscaffResult<CheckOutcome> {
        let command = format!("make {target}");
        debug!(%command, "Running project command");

        let output = Command::new("make")
            .arg(target)
            .current_dir(&self.root)
            .output()
            .map_err(|e| ApplicationError::CommandFailed {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        info!(%command, success = output.status.success(), "Project command finished");

        Ok(CheckOutcome {
            success: output.status.success(),
            status: output.status.code(),
            output: text,
        })
    }
}

impl ArtifactInspector for GeneratedProject {
    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.root.join(path).is_dir()
    }

    fn read_to_string(&self, path: &Path) -> PyscaffResult<String> {
        std::fs::read_to_string(self.root.join(path)).map_err(|e| invalid(path, e.to_string()))
    }

    fn parses_as_yaml(&self, path: &Path) -> PyscaffResult<()> {
        check_yaml(path, &self.read_to_string(path)?)
    }

    fn parses_as_toml(&self, path: &Path) -> PyscaffResult<()> {
        check_toml(path, &self.read_to_string(path)?)
    }

    fn toml_string(&self, path: &Path, dotted_key: &str) -> PyscaffResult<Option<String>> {
        toml_string_at(path, &self.read_to_string(path)?, dotted_key)
    }
}

pub(crate) fn invalid(path: &Path, reason: impl Into<String>) -> PyscaffError {
    ApplicationError::InvalidArtifact {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

pub(crate) fn check_yaml(path: &Path, text: &str) -> PyscaffResult<()> {
    serde_yaml::from_str::<serde_yaml::Value>(text)
        .map(|_| ())
        .map_err(|e| invalid(path, format!("invalid YAML: {e}")))
}

pub(crate) fn check_toml(path: &Path, text: &str) -> PyscaffResult<()> {
    toml::from_str::<toml::Table>(text)
        .map(|_| ())
        .map_err(|e| invalid(path, format!("invalid TOML: {e}")))
}

pub(crate) fn toml_string_at(
    path: &Path,
    text: &str,
    dotted_key: &str,
) -> PyscaffResult<Option<String>> {
    let table: toml::Table =
        toml::from_str(text).map_err(|e| invalid(path, format!("invalid TOML: {e}")))?;

    let mut segments = dotted_key.split('.');
    let Some(first) = segments.next() else {
        return Ok(None);
    };
    let value = segments.fold(table.get(first), |current, segment| {
        current.and_then(|v| v.get(segment))
    });

    Ok(value.and_then(|v| v.as_str()).map(str::to_string))
}
