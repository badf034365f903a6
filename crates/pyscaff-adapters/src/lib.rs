//! Infrastructure adapters for pyscaff.
//!
//! This crate implements the ports defined in `pyscaff_core::application::ports`
//! and owns the built-in `python-package` template. All I/O lives here.

pub mod builtin_templates;
pub mod filesystem;
pub mod inspect;
pub mod renderer;
pub mod template_loader;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem, MemoryProject};
pub use inspect::{CheckOutcome, GeneratedProject};
pub use renderer::SimpleRenderer;
pub use template_store::{BuiltinStore, DirectoryStore};
