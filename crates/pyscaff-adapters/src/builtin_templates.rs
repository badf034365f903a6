//! The built-in `python-package` template.
//!
//! Every document and source file is embedded at compile time, so the
//! binary needs nothing on disk. The template is parsed and validated once
//! per process and shared read-only afterwards.
//!
//! The embedded directory is also a valid `--template-dir`: loading it with
//! [`FilesystemTemplateLoader`](crate::template_loader::FilesystemTemplateLoader)
//! yields the same template.

use std::sync::OnceLock;

use tracing::{debug, instrument};

use pyscaff_core::domain::{DomainError, Template, TemplateSource};

use crate::template_loader;

macro_rules! embed {
    ($($path:literal),+ $(,)?) => {
        &[$(($path, include_str!(concat!("../templates/python-package/", $path)))),+]
    };
}

const MANIFEST: &str = include_str!("../templates/python-package/template.toml");
const OPTIONS: &str = include_str!("../templates/python-package/options.json");

/// Source files keyed by their path below the template root.
static SOURCES: &[(&str, &str)] = embed![
    "pyproject.toml",
    "README.md",
    "CONTRIBUTING.md",
    "Makefile",
    "gitignore",
    ".pre-commit-config.yaml",
    "tests/test_foo.py",
    "package/__init__.py",
    "package/foo.py",
    "package/py.typed",
    "licenses/mit.txt",
    "licenses/bsd-3-clause.txt",
    "licenses/isc.txt",
    "licenses/apache-2.0.txt",
    "licenses/gpl-3.0.txt",
    "zensical.toml",
    "docs/index.md",
    "docs/modules.md",
    ".github/workflows/main.yml",
    ".github/actions/setup-python-env/action.yml",
    ".github/workflows/docs.yml",
    ".github/workflows/publish.yml",
];

/// Id of the built-in template.
pub const PYTHON_PACKAGE: &str = "python-package";

/// The built-in template, parsed on first use.
///
/// # Errors
///
/// Only if the embedded definition is inconsistent, which the test suite
/// rules out; the error is cached like the template.
pub fn python_package() -> Result<&'static Template, DomainError> {
    static TEMPLATE: OnceLock<Result<Template, DomainError>> = OnceLock::new();
    TEMPLATE.get_or_init(parse).as_ref().map_err(Clone::clone)
}

/// Raw `options.json` of the built-in template.
pub fn options_document() -> &'static str {
    OPTIONS
}

#[instrument]
fn parse() -> Result<Template, DomainError> {
    let template = template_loader::load_from_sources(
        MANIFEST,
        OPTIONS,
        SOURCES
            .iter()
            .map(|&(path, content)| (path.to_string(), TemplateSource::Static(content))),
    )?;
    debug!(id = %template.id, nodes = template.tree.len(), "Built-in template parsed");
    Ok(template)
}
