//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `pyscaff-adapters` crate provides implementations.

use crate::domain::{EffectiveOptions, ProjectStructure, RenderContext, Template};
use crate::error::PyscaffResult;
use std::path::Path;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `pyscaff_adapters::filesystem::LocalFilesystem` (production)
/// - `pyscaff_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PyscaffResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> PyscaffResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> PyscaffResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> PyscaffResult<()>;
}

/// Port for template retrieval.
///
/// Implemented by:
/// - `pyscaff_adapters::template_store::BuiltinStore` (embedded template)
/// - `pyscaff_adapters::template_store::DirectoryStore` (`--template-dir`)
pub trait TemplateStore: Send + Sync {
    /// Load the template, validated.
    fn load(&self) -> PyscaffResult<Template>;

    /// Human-readable location for logs and errors.
    fn location(&self) -> String;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `pyscaff_adapters::renderer::SimpleRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render the nodes whose conditions hold into a project structure.
    ///
    /// # Arguments
    ///
    /// * `template` - The template to render
    /// * `context` - Variables and flags for substitution
    /// * `options` - Effective options, used to evaluate node conditions
    /// * `output_root` - Root directory of the new project
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        options: &EffectiveOptions,
        output_root: &Path,
    ) -> PyscaffResult<ProjectStructure>;
}

/// Read-only access to a generated tree. Paths are relative to its root.
///
/// Implemented by:
/// - `pyscaff_adapters::inspect::GeneratedProject` (a directory on disk)
/// - `pyscaff_adapters::filesystem::MemoryProject` (a root inside a `MemoryFilesystem`)
pub trait ArtifactInspector {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> PyscaffResult<String>;

    /// `Ok(())` when the file parses as YAML.
    fn parses_as_yaml(&self, path: &Path) -> PyscaffResult<()>;

    /// `Ok(())` when the file parses as TOML.
    fn parses_as_toml(&self, path: &Path) -> PyscaffResult<()>;

    /// String value at a dotted key (e.g. `project.name`), `None` if absent
    /// or not a string.
    fn toml_string(&self, path: &Path, dotted_key: &str) -> PyscaffResult<Option<String>>;
}
