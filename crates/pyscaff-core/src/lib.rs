//! pyscaff Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the pyscaff
//! Python package generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           pyscaff-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, ContractVerifier)    │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Store, Filesystem, Render, Inspector)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    pyscaff-adapters (Infrastructure)    │
//! │  (BuiltinStore, LocalFilesystem, etc)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (OptionSchema, Template, Contract, ...) │
//! │         No I/O                          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use pyscaff_core::application::{GenerateRequest, ScaffoldService};
//!
//! // Adapters come from `pyscaff-adapters`.
//! let service = ScaffoldService::new(store, renderer, filesystem);
//!
//! let mut overrides = BTreeMap::new();
//! overrides.insert("layout".to_string(), "flat".to_string());
//!
//! let report = service
//!     .generate(GenerateRequest::new(overrides, "./output"))
//!     .unwrap();
//! println!("created {}", report.root.display());
//! ```

// Domain layer (stable, well-defined API)
pub mod domain;

// Application layer (orchestration logic)
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ContractVerifier, GenerateRequest, GenerationReport, ScaffoldService, VerificationReport,
        ports::{ArtifactInspector, Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        Condition, EffectiveOptions, GenerationContract, OptionSchema, ProjectIdentity,
        ProjectStructure, RenderContext, Template, TemplateId, TemplateMetadata,
    };
    pub use crate::error::{PyscaffError, PyscaffResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
