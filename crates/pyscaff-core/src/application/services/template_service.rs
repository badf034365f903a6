//! Template Service - template metadata queries.
//!
//! Separated from ScaffoldService for single responsibility: the `options`
//! command only needs to describe the schema, never to render.

use serde::Serialize;

use crate::{
    application::ports::TemplateStore,
    domain::{OptionSpec, Template},
    error::PyscaffResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub schema_version: u32,
    pub options: Vec<OptionSpec>,
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Load the template.
    pub fn load(&self) -> PyscaffResult<Template> {
        self.store.load()
    }

    /// Describe the template and its option schema.
    pub fn describe(&self) -> PyscaffResult<TemplateInfo> {
        let template = self.store.load()?;

        Ok(TemplateInfo {
            id: template.id.to_string(),
            name: template.metadata.name.clone(),
            description: template.metadata.description.clone(),
            location: self.store.location(),
            schema_version: template.schema.version(),
            options: template.schema.options().to_vec(),
        })
    }
}
