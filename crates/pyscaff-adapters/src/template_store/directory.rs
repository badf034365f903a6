//! Store reading a template directory on disk (`--template-dir`).

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{debug, instrument};

use pyscaff_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::Template,
    error::PyscaffResult,
};

use crate::template_loader::FilesystemTemplateLoader;

/// Template loaded from a directory, cached after the first load.
pub struct DirectoryStore {
    loader: FilesystemTemplateLoader,
    cache: RwLock<Option<Template>>,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            loader: FilesystemTemplateLoader::new(dir),
            cache: RwLock::new(None),
        }
    }
}

impl TemplateStore for DirectoryStore {
    #[instrument(skip(self), fields(dir = %self.loader.dir().display()))]
    fn load(&self) -> PyscaffResult<Template> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(template) = cache.as_ref() {
                return Ok(template.clone());
            }
        }

        if !self.loader.is_template_dir() {
            return Err(ApplicationError::TemplateNotFound {
                location: self.location(),
            }
            .into());
        }

        let template = self
            .loader
            .load()
            .map_err(|e| ApplicationError::TemplateLoad {
                location: self.location(),
                reason: e.to_string(),
            })?;
        debug!(id = %template.id, "Template loaded from directory");

        let mut cache = self
            .cache
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        *cache = Some(template.clone());
        Ok(template)
    }

    fn location(&self) -> String {
        self.loader.dir().display().to_string()
    }
}
