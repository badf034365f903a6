//! Core domain layer for pyscaff.
//!
//! This module contains pure business logic with no I/O. Filesystem access,
//! template loading and artifact inspection are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: option sets, identities and templates never
//!   change after construction
//! - **Rich domain model**: behavior lives with the data (`Condition::evaluate`,
//!   `OptionSchema::resolve`, `RenderContext::render`)

// Public API - what the world sees
pub mod condition;
pub mod contract;
pub mod entities;
pub mod error;
pub mod identity;
pub mod options;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use condition::Condition;
pub use contract::{ContractRule, Expectation, FieldCheck, GenerationContract, VerificationFailure};
pub use entities::{
    common::{Permissions, RelativePath},
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    template::{
        BlockKind, DirectorySpec, FileSpec, RenderContext, RenderError, Template,
        TemplateBuilder, TemplateContent, TemplateId, TemplateMetadata, TemplateNode,
        TemplateSource, TemplateTree,
    },
};
pub use error::{DomainError, ErrorCategory};
pub use identity::{ProjectIdentity, hyphenate, slugify};
pub use options::{EffectiveOptions, NO, OptionKind, OptionSchema, OptionSpec, YES, keys};
pub use validation::DomainValidator;
pub use value_objects::{Layout, License};
