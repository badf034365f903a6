//! Command handlers. Each module translates parsed arguments into calls on
//! the core services and prints the outcome.

pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod options;
pub mod verify;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use pyscaff_adapters::{BuiltinStore, DirectoryStore};
use pyscaff_core::application::TemplateStore;

use crate::config::AppConfig;

/// Template store for a command: `--template-dir`, then
/// `templates.local_path` from the config, then the built-in template.
pub fn template_store(flag: Option<&Path>, config: &AppConfig) -> Box<dyn TemplateStore> {
    match flag.or(config.templates.local_path.as_deref()) {
        Some(dir) => {
            debug!(dir = %dir.display(), "Using template directory");
            Box::new(DirectoryStore::new(dir))
        }
        None => Box::new(BuiltinStore),
    }
}

/// Layer option overrides: config defaults, then `-o` pairs, then the
/// positional project name.
pub fn merge_overrides(
    config: &AppConfig,
    pairs: &[(String, String)],
    name: Option<&str>,
) -> BTreeMap<String, String> {
    let mut overrides = config.defaults.clone();
    overrides.extend(pairs.iter().cloned());
    if let Some(name) = name {
        overrides.insert(pyscaff_core::domain::keys::PROJECT_NAME.to_string(), name.to_string());
    }
    overrides
}
