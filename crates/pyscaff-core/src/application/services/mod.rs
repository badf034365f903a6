//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "verify a tree".

pub mod scaffold_service;
pub mod template_service;
pub mod verify_service;

pub use scaffold_service::{GenerateRequest, GenerationReport, ScaffoldService};
pub use template_service::{TemplateInfo, TemplateService};
pub use verify_service::{ContractVerifier, VerificationReport};
