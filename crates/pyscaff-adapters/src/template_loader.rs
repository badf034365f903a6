//! Template loader: `template.toml` + `options.json` + source files.
//!
//! Converts a template definition into a validated domain [`Template`]. The
//! same code path serves the embedded built-in template and a template
//! directory on disk.
//!
//! # Directory layout expected
//!
//! ```text
//! python-package/
//! ├── template.toml            ← manifest (required)
//! ├── options.json             ← option schema (required)
//! ├── pyproject.toml           ← file content
//! └── licenses/
//!     └── mit.txt              ← source of a conditional LICENSE
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "python-package"   # unique identifier
//! version = "1.0.0"
//!
//! [metadata]
//! name        = "Python package (uv)"
//! description = "..."          # optional
//! author      = "pyscaff"      # optional
//! tags        = ["python"]     # optional
//!
//! [[directories]]
//! path = "docs"
//! when = { option = "zensical", equals = "y" }
//!
//! # Output path and source may differ; both may be omitted except `path`.
//! # Without `type`, content containing {{ }} is parameterized.
//! [[files]]
//! path   = "LICENSE"
//! source = "licenses/mit.txt"
//! type   = "parameterized"     # literal | parameterized
//! when   = { option = "open_source_license", equals = "MIT license" }
//! ```
//!
//! Conditions nest: `{ all = [..] }`, `{ any = [..] }`, `{ not = {..} }` and
//! `{ option = "x", not_equals = "y" }`.
//!
//! # `options.json` format
//!
//! Cookiecutter style. A string value declares a text option with that
//! default; an array declares a choice option whose first element is the
//! default. Keys starting with `_` are metadata; `_schema` is the version.
//!
//! Source files that no manifest entry references are added verbatim as
//! unconditional files at their own path.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use pyscaff_core::domain::{
    Condition, DirectorySpec, DomainError, FileSpec, OptionSchema, OptionSpec, RelativePath,
    Template, TemplateBuilder, TemplateContent, TemplateId, TemplateMetadata, TemplateNode,
    TemplateSource, TemplateTree,
};

pub const MANIFEST_FILE: &str = "template.toml";
pub const OPTIONS_FILE: &str = "options.json";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub metadata: MetadataSection,
    /// Output files, in render order.
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Directories that must exist even if they contain no files.
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
}

/// `[template]` section: identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub version: String,
}

/// `[metadata]` section: human-facing information about the template.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    /// Display name shown by `pyscaff options`.
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// One entry under `[[files]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    /// Output path relative to the project root; may contain `{{VARIABLE}}`.
    pub path: String,
    /// Source file relative to the template root. Defaults to `path`.
    pub source: Option<String>,
    /// Content handling; auto-detected when omitted.
    #[serde(rename = "type")]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub executable: bool,
    pub when: Option<ConditionSpec>,
}

impl FileEntry {
    fn source_path(&self) -> String {
        normalize_path(self.source.as_deref().unwrap_or(&self.path))
    }
}

/// Controls how a file's content is treated during scaffolding.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Content is copied verbatim, without variable substitution.
    Literal,
    /// Content contains `{{VARIABLE}}` placeholders and blocks.
    Parameterized,
}

/// One entry under `[[directories]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryEntry {
    pub path: String,
    pub when: Option<ConditionSpec>,
}

/// A `when` condition as written in TOML.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConditionSpec {
    Equals { option: String, equals: String },
    NotEquals { option: String, not_equals: String },
    All { all: Vec<ConditionSpec> },
    Any { any: Vec<ConditionSpec> },
    Not { not: Box<ConditionSpec> },
}

impl From<ConditionSpec> for Condition {
    fn from(spec: ConditionSpec) -> Self {
        match spec {
            ConditionSpec::Equals { option, equals } => Condition::equals(option, equals),
            ConditionSpec::NotEquals { option, not_equals } => {
                Condition::not_equals(option, not_equals)
            }
            ConditionSpec::All { all } => Condition::all(all.into_iter().map(Condition::from)),
            ConditionSpec::Any { any } => Condition::any(any.into_iter().map(Condition::from)),
            ConditionSpec::Not { not } => Condition::from(*not).negate(),
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse a `template.toml` document.
pub fn parse_manifest(raw: &str) -> Result<TemplateManifest, DomainError> {
    toml::from_str(raw)
        .map_err(|e| DomainError::InvalidTemplate(format!("failed to parse {MANIFEST_FILE}: {e}")))
}

/// Parse an `options.json` document into an [`OptionSchema`].
///
/// Options keep their document order.
pub fn parse_option_schema(raw: &str) -> Result<OptionSchema, DomainError> {
    let doc: Map<String, Value> = serde_json::from_str(raw).map_err(|e| {
        DomainError::InvalidSchema(format!("{OPTIONS_FILE} must be a JSON object: {e}"))
    })?;

    let mut version = 1;
    let mut options = Vec::with_capacity(doc.len());

    for (name, value) in doc {
        if name.starts_with('_') {
            if name == "_schema" {
                version = value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| {
                        DomainError::InvalidSchema(format!(
                            "_schema must be a positive integer, found {value}"
                        ))
                    })?;
            }
            continue;
        }

        let spec = match value {
            Value::String(default) => OptionSpec::text(name, default),
            Value::Array(items) => {
                let values = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        other => Err(DomainError::InvalidSchema(format!(
                            "choices of '{name}' must be strings, found {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                OptionSpec::choice(name, values)
            }
            other => {
                return Err(DomainError::InvalidSchema(format!(
                    "option '{name}' must be a string or an array of strings, found {other}"
                )));
            }
        };
        options.push(spec);
    }

    OptionSchema::new(version, options)
}

/// Build a validated template from its parsed parts.
///
/// `sources` maps normalized relative paths to file contents; it must not
/// contain the manifest or the schema document.
pub fn assemble(
    manifest: TemplateManifest,
    schema: OptionSchema,
    mut sources: BTreeMap<String, TemplateSource>,
) -> Result<Template, DomainError> {
    let mut tree = TemplateTree::new();
    let mut referenced: BTreeSet<String> = BTreeSet::new();

    for entry in manifest.directories {
        let mut spec = DirectorySpec::new(RelativePath::try_new(normalize_path(&entry.path))?);
        if let Some(when) = entry.when {
            spec = spec.when(when.into());
        }
        tree.push(TemplateNode::Directory(spec));
    }

    for entry in &manifest.files {
        let source_path = entry.source_path();
        let source = sources.get(&source_path).cloned().ok_or_else(|| {
            DomainError::InvalidTemplate(format!(
                "file '{}' refers to missing source '{source_path}'",
                entry.path
            ))
        })?;

        let content = match entry.file_type {
            Some(FileType::Literal) => TemplateContent::Literal(source),
            Some(FileType::Parameterized) => TemplateContent::Parameterized(source),
            None => TemplateContent::detect(source),
        };

        let mut spec = FileSpec::new(RelativePath::try_new(normalize_path(&entry.path))?, content);
        if entry.executable {
            spec = spec.executable();
        }
        if let Some(when) = entry.when.clone() {
            spec = spec.when(when.into());
        }
        tree.push(TemplateNode::File(spec));
        referenced.insert(source_path);
    }

    sources.retain(|path, _| !referenced.contains(path));
    for (path, source) in sources {
        debug!(%path, "adding unlisted template file");
        tree.push(TemplateNode::File(FileSpec::new(
            RelativePath::try_new(path)?,
            TemplateContent::detect(source),
        )));
    }

    let id = TemplateId::new(&manifest.template.id, &manifest.template.version)?;
    let meta = manifest.metadata;
    let metadata = TemplateMetadata::new(meta.name)
        .description(meta.description.unwrap_or_default())
        .version(manifest.template.version)
        .author(meta.author.unwrap_or_else(|| "pyscaff".into()))
        .tags(meta.tags.unwrap_or_default());

    TemplateBuilder::default()
        .id(id)
        .metadata(metadata)
        .schema(schema)
        .tree(tree)
        .build()
}

/// Build a template from documents held in memory.
pub fn load_from_sources(
    manifest: &str,
    options: &str,
    sources: impl IntoIterator<Item = (String, TemplateSource)>,
) -> Result<Template, DomainError> {
    let sources = sources
        .into_iter()
        .map(|(path, source)| (normalize_path(&path), source))
        .collect();
    assemble(parse_manifest(manifest)?, parse_option_schema(options)?, sources)
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads a [`Template`] from a template directory on disk.
///
/// # Example
///
/// ```no_run
/// use pyscaff_adapters::template_loader::FilesystemTemplateLoader;
///
/// let template = FilesystemTemplateLoader::new("./my-template").load()?;
/// println!("Loaded {}", template.id);
/// # Ok::<(), pyscaff_core::domain::DomainError>(())
/// ```
pub struct FilesystemTemplateLoader {
    dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `true` when the directory holds both definition documents.
    pub fn is_template_dir(&self) -> bool {
        self.dir.join(MANIFEST_FILE).is_file() && self.dir.join(OPTIONS_FILE).is_file()
    }

    /// Load and validate the template.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidTemplate`] when a document or source file cannot
    /// be read or parsed, [`DomainError::InvalidSchema`] for a malformed
    /// `options.json`, and any error from template validation.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn load(&self) -> Result<Template, DomainError> {
        let manifest = parse_manifest(&self.read(MANIFEST_FILE)?)?;
        let schema = parse_option_schema(&self.read(OPTIONS_FILE)?)?;
        let sources = self.collect_sources()?;

        debug!(sources = sources.len(), "collected template sources");
        assemble(manifest, schema, sources)
    }

    fn read(&self, name: &str) -> Result<String, DomainError> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to read '{}': {e}", path.display()))
        })
    }

    /// Every regular file except the two definition documents.
    fn collect_sources(&self) -> Result<BTreeMap<String, TemplateSource>, DomainError> {
        let mut sources = BTreeMap::new();

        for walk_entry in WalkDir::new(&self.dir).min_depth(1) {
            let walk_entry = walk_entry
                .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
            if !walk_entry.file_type().is_file() {
                continue;
            }

            let abs_path = walk_entry.path();
            let rel_raw = abs_path.strip_prefix(&self.dir).map_err(|_| {
                DomainError::InvalidTemplate(format!(
                    "failed to relativise '{}' against '{}'",
                    abs_path.display(),
                    self.dir.display()
                ))
            })?;

            let path_str = normalize_path(&rel_raw.to_string_lossy());
            if path_str == MANIFEST_FILE || path_str == OPTIONS_FILE {
                continue;
            }

            let content = fs::read_to_string(abs_path).map_err(|e| {
                DomainError::InvalidTemplate(format!("failed to read file '{path_str}': {e}"))
            })?;
            sources.insert(path_str, TemplateSource::from(content));
        }

        Ok(sources)
    }
}

/// Normalise a path to forward slashes so Windows and Unix paths compare
/// identically throughout the loader.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
