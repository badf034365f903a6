//! Store serving the embedded `python-package` template.

use pyscaff_core::{application::ports::TemplateStore, domain::Template, error::PyscaffResult};

use crate::builtin_templates;

/// The template compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStore;

impl BuiltinStore {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateStore for BuiltinStore {
    fn load(&self) -> PyscaffResult<Template> {
        Ok(builtin_templates::python_package()?.clone())
    }

    fn location(&self) -> String {
        format!("built-in:{}", builtin_templates::PYTHON_PACKAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_the_embedded_template() {
        let store = BuiltinStore::new();
        let t = store.load().unwrap();
        assert_eq!(t.id.to_string(), "python-package@1.0.0");
        assert_eq!(store.location(), "built-in:python-package");
    }
}
