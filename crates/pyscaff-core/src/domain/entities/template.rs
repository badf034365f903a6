//! Template domain aggregate and rendering infrastructure.
//!
//! Templates are the central concept in pyscaff: a declarative tree of
//! files and directories, each guarded by a [`Condition`] over the
//! effective option set, plus the option schema that governs them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Template Domain                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Template (Aggregate Root)                                  │
//! │  ├── TemplateId (Entity)           python-package@1.0.0     │
//! │  ├── TemplateMetadata (Value Object)                        │
//! │  ├── OptionSchema (Value Object)   what the user may choose │
//! │  └── TemplateTree (Value Object)   what to create           │
//! │       └── Vec<TemplateNode>                                 │
//! │            ├── FileSpec (path, content, perms, when)        │
//! │            └── DirectorySpec (path, perms, when)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RenderContext (Value Object)                               │
//! │  ├── {{PROJECT_SLUG}}         -> "my_project"               │
//! │  └── {{#if zensical}}…{{/if}} -> kept or dropped            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Decisions
//!
//! ### Two content types: `Literal` vs `Parameterized`
//!
//! Literal content skips the rendering engine entirely. A LICENSE text
//! without placeholders is copied as-is; a `pyproject.toml` with
//! `{{PROJECT_NAME_KEBAB}}` goes through [`RenderContext::render`].
//!
//! ### `TemplateSource` with `Static` vs `Owned`
//!
//! `Static` references compile-time strings (`include_str!`) without
//! allocation. `Owned` holds content loaded from a template directory.
//!
//! ### Conditions on nodes, blocks in content
//!
//! Whether a file exists is decided by its node's `when` condition.
//! Whether a section inside a file exists is decided by `{{#if flag}}` /
//! `{{#unless flag}}` blocks. Nothing else is supported; this is not a
//! general templating language.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::Datelike;

use crate::domain::{
    condition::Condition,
    entities::common::{Permissions, RelativePath},
    error::DomainError,
    identity::ProjectIdentity,
    options::{EffectiveOptions, NO, OptionSchema, YES, keys},
    value_objects::{Layout, License},
};

// ============================================================================
// Render Context
// ============================================================================

/// Context for template rendering.
///
/// A **Value Object** containing all data needed to render a parameterized
/// template. Immutable after creation; `with_variable`/`with_flag` consume
/// and return a new instance.
///
/// ## Built-in Variables
///
/// | Variable | Example | Source |
/// |----------|---------|--------|
/// | `PROJECT_NAME` | "My-Project" | User input |
/// | `PROJECT_SLUG` | "my_project" | Computed |
/// | `PROJECT_NAME_KEBAB` | "my-project" | Computed |
/// | `PACKAGE_DIR` | "src/my_project" | Computed from `layout` |
/// | `YEAR` | "2026" | System clock |
/// | `LICENSE_SPDX` | "MIT" | Computed from `open_source_license` |
/// | `LICENSE_CLASSIFIER` | "License :: OSI Approved :: MIT License" | Computed |
///
/// Every effective option is also a variable under its own snake_case name
/// (`{{author_name}}`), and every `y`/`n` option is a block flag. The
/// built-in flags are `open_source`, `src_layout` and `flat_layout`.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Original project name, kept for display.
    project_name: String,
    variables: HashMap<String, String>,
    flags: HashMap<String, bool>,
}

impl RenderContext {
    /// Create a context carrying only identity-derived variables.
    pub fn new(identity: &ProjectIdentity) -> Self {
        let mut variables = HashMap::new();
        variables.insert("PROJECT_NAME".to_string(), identity.name().to_string());
        variables.insert("PROJECT_SLUG".to_string(), identity.slug().to_string());
        variables.insert(
            "PROJECT_NAME_KEBAB".to_string(),
            identity.hyphenated().to_string(),
        );
        variables.insert("YEAR".to_string(), chrono::Utc::now().year().to_string());

        Self {
            project_name: identity.name().to_string(),
            variables,
            flags: HashMap::new(),
        }
    }

    /// Build the full context for one generation request.
    ///
    /// Options the schema declares as `y`/`n` choices become flags. Layout
    /// and license values, when the schema has them, add their derived
    /// variables and flags.
    pub fn for_project(
        identity: &ProjectIdentity,
        options: &EffectiveOptions,
        schema: &OptionSchema,
    ) -> Self {
        let mut ctx = Self::new(identity);

        for (name, value) in options.iter() {
            ctx.variables.insert(name.to_string(), value.to_string());
            if schema.get(name).is_some_and(|spec| spec.is_flag()) {
                ctx.flags.insert(name.to_string(), value == YES);
            }
        }

        let layout = options
            .get(keys::LAYOUT)
            .and_then(|v| v.parse::<Layout>().ok())
            .unwrap_or(Layout::Src);
        ctx.variables.insert(
            "PACKAGE_DIR".to_string(),
            identity.package_dir(layout.is_src()),
        );
        ctx.flags.insert("src_layout".to_string(), layout.is_src());
        ctx.flags.insert("flat_layout".to_string(), !layout.is_src());

        if let Some(license) = options
            .get(keys::LICENSE)
            .and_then(|v| v.parse::<License>().ok())
        {
            ctx.variables.insert(
                "LICENSE_SPDX".to_string(),
                license.spdx().unwrap_or("LicenseRef-Proprietary").to_string(),
            );
            ctx.variables.insert(
                "LICENSE_CLASSIFIER".to_string(),
                license.classifier().to_string(),
            );
            ctx.flags
                .insert("open_source".to_string(), license.is_open_source());
        }

        ctx
    }

    /// Add a custom variable, consuming self and returning a new context.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Add a block flag, consuming self and returning a new context.
    pub fn with_flag(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(key.into(), enabled);
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    /// Render a template string.
    ///
    /// # Syntax
    ///
    /// - `{{NAME}}` is replaced by the variable's value. Unknown names,
    ///   including GitHub Actions' `${{ secrets.X }}`, stay literal.
    /// - `{{#if flag}}…{{/if}}` keeps its body only when `flag` is on;
    ///   `{{#unless flag}}…{{/unless}}` only when it is off. Blocks nest.
    /// - A block tag alone on its line (surrounding whitespace allowed)
    ///   removes that whole line from the output.
    ///
    /// # Errors
    ///
    /// [`RenderError`] for an unknown flag, a close tag without a matching
    /// open tag, or a block left open at the end of input.
    pub fn render(&self, template: &str) -> Result<String, RenderError> {
        let mut out = String::with_capacity(template.len());
        let mut stack: Vec<OpenBlock> = Vec::new();

        for (idx, line) in template.split_inclusive('\n').enumerate() {
            let line_no = idx + 1;

            if let Some(tag) = standalone_tag(line) {
                self.apply_tag(tag, &mut stack, line_no)?;
                continue;
            }

            self.render_line(line, &mut stack, &mut out, line_no)?;
        }

        match stack.pop() {
            Some(open) => Err(RenderError::Unclosed {
                kind: open.kind,
                flag: open.flag,
                line: open.line,
            }),
            None => Ok(out),
        }
    }

    fn render_line(
        &self,
        line: &str,
        stack: &mut Vec<OpenBlock>,
        out: &mut String,
        line_no: usize,
    ) -> Result<(), RenderError> {
        let mut rest = line;

        while let Some(start) = rest.find("{{") {
            let (before, after) = rest.split_at(start);
            if emitting(stack) {
                out.push_str(before);
            }

            let body = &after[2..];
            let Some(end) = body.find("}}") else {
                if emitting(stack) {
                    out.push_str(after);
                }
                return Ok(());
            };

            let inner = &body[..end];
            match Tag::parse(inner) {
                Some(tag) => self.apply_tag(tag, stack, line_no)?,
                None if emitting(stack) => match self.variables.get(inner) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(inner);
                        out.push_str("}}");
                    }
                },
                None => {}
            }

            rest = &body[end + 2..];
        }

        if emitting(stack) {
            out.push_str(rest);
        }
        Ok(())
    }

    fn apply_tag(
        &self,
        tag: Tag<'_>,
        stack: &mut Vec<OpenBlock>,
        line_no: usize,
    ) -> Result<(), RenderError> {
        match tag {
            Tag::Open(kind, flag) => {
                let value = self.flag(flag).ok_or_else(|| RenderError::UnknownFlag {
                    flag: flag.to_string(),
                    line: line_no,
                })?;
                let keep = match kind {
                    BlockKind::If => value,
                    BlockKind::Unless => !value,
                };
                let parent = emitting(stack);
                stack.push(OpenBlock {
                    kind,
                    flag: flag.to_string(),
                    line: line_no,
                    emitting: parent && keep,
                });
                Ok(())
            }
            Tag::Close(kind) => match stack.pop() {
                Some(open) if open.kind == kind => Ok(()),
                Some(open) => Err(RenderError::Mismatched {
                    expected: open.kind,
                    found: kind,
                    line: line_no,
                }),
                None => Err(RenderError::Unopened {
                    kind,
                    line: line_no,
                }),
            },
        }
    }
}

/// Why a template string could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("line {line}: unknown flag '{flag}'")]
    UnknownFlag { flag: String, line: usize },

    #[error("line {line}: /{kind} without a matching #{kind}")]
    Unopened { kind: BlockKind, line: usize },

    #[error("line {line}: /{found} closes a #{expected} block")]
    Mismatched {
        expected: BlockKind,
        found: BlockKind,
        line: usize,
    },

    #[error("#{kind} {flag} opened on line {line} is never closed")]
    Unclosed {
        kind: BlockKind,
        flag: String,
        line: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Unless,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::If => "if",
            Self::Unless => "unless",
        })
    }
}

#[derive(Debug)]
struct OpenBlock {
    kind: BlockKind,
    flag: String,
    line: usize,
    emitting: bool,
}

fn emitting(stack: &[OpenBlock]) -> bool {
    stack.last().is_none_or(|b| b.emitting)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag<'a> {
    Open(BlockKind, &'a str),
    Close(BlockKind),
}

impl<'a> Tag<'a> {
    fn parse(inner: &'a str) -> Option<Self> {
        let flag = |s: &'a str| {
            let s = s.trim();
            (!s.is_empty() && !s.contains(char::is_whitespace)).then_some(s)
        };

        if let Some(rest) = inner.strip_prefix("#if ") {
            flag(rest).map(|f| Self::Open(BlockKind::If, f))
        } else if let Some(rest) = inner.strip_prefix("#unless ") {
            flag(rest).map(|f| Self::Open(BlockKind::Unless, f))
        } else {
            match inner.trim() {
                "/if" => Some(Self::Close(BlockKind::If)),
                "/unless" => Some(Self::Close(BlockKind::Unless)),
                _ => None,
            }
        }
    }
}

/// A line holding exactly one block tag and whitespace.
fn standalone_tag(line: &str) -> Option<Tag<'_>> {
    let inner = line.trim().strip_prefix("{{")?.strip_suffix("}}")?;
    if inner.contains("{{") || inner.contains("}}") {
        return None;
    }
    Tag::parse(inner)
}

// ============================================================================
// Template Identity
// ============================================================================

/// Unique identifier for a template type.
///
/// Human-readable form is `name@version` (e.g., `python-package@1.0.0`).
/// Names cannot contain `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    /// Create a new template ID.
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` if the name contains `@`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.contains('@') {
            return Err(DomainError::InvalidTemplate(format!(
                "Template name cannot contain @: {name}"
            )));
        }
        Ok(Self {
            name,
            version: version.into(),
        })
    }

    /// Parse from string format `name@version`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.split_once('@') {
            Some((name, version)) if !version.contains('@') => Self::new(name, version),
            _ => Err(DomainError::InvalidTemplate(format!(
                "Invalid template ID format: {s}. Expected 'name@version'"
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

// ============================================================================
// Core Template Aggregate
// ============================================================================

/// The central domain aggregate: a reusable project blueprint.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `id.name` is non-empty
/// 2. `metadata.name` is non-empty
/// 3. `tree` is non-empty
/// 4. No two nodes share both path and condition
/// 5. Every condition references declared options and in-domain values
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub metadata: TemplateMetadata,
    pub schema: OptionSchema,
    pub tree: TemplateTree,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.name().is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template name cannot be empty".into(),
            ));
        }

        if self.metadata.name.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Metadata name cannot be empty".into(),
            ));
        }

        if self.tree.is_empty() {
            return Err(DomainError::EmptyTemplate {
                template_id: self.id.to_string(),
            });
        }

        // Two variants of one path are fine as long as their conditions differ
        // (e.g. one LICENSE per license choice).
        let mut seen = HashSet::new();
        for node in &self.tree.nodes {
            if !seen.insert((node.path().as_str(), node.condition())) {
                return Err(DomainError::DuplicatePath {
                    path: node.path().to_string(),
                });
            }
            node.condition().validate_against(&self.schema)?;
        }

        Ok(())
    }

    /// Nodes whose condition holds for `options`, in tree order.
    pub fn active_nodes<'a>(
        &'a self,
        options: &'a EffectiveOptions,
    ) -> impl Iterator<Item = &'a TemplateNode> + 'a {
        self.tree
            .nodes
            .iter()
            .filter(move |n| n.condition().evaluate(options))
    }
}

/// Builder for constructing templates with validation.
///
/// `build()` requires `id`, `metadata` and `schema`, and a non-empty tree.
#[derive(Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    metadata: Option<TemplateMetadata>,
    schema: Option<OptionSchema>,
    tree: TemplateTree,
}

impl TemplateBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn schema(mut self, schema: OptionSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the entire tree at once (replaces any previous nodes).
    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    /// Add a single node to the tree (accumulates).
    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    /// Consume builder and construct a validated `Template`.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` if id/metadata/schema not set
    /// - any error from [`Template::validate`]
    pub fn build(self) -> Result<Template, DomainError> {
        let template = Template {
            id: self
                .id
                .ok_or(DomainError::MissingRequiredField { field: "id" })?,
            metadata: self
                .metadata
                .ok_or(DomainError::MissingRequiredField { field: "metadata" })?,
            schema: self
                .schema
                .ok_or(DomainError::MissingRequiredField { field: "schema" })?,
            tree: self.tree,
        };
        template.validate()?;
        Ok(template)
    }
}

// ============================================================================
// Template Metadata
// ============================================================================

/// Human-readable information about a template.
#[derive(Debug, Clone)]
pub struct TemplateMetadata {
    /// Short display name (e.g., "Python package (uv)")
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    /// Searchable tags
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: "0.1.0".to_string(),
            author: "pyscaff".to_string(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn version(mut self, ver: impl Into<String>) -> Self {
        self.version = ver.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

// ============================================================================
// Template Tree
// ============================================================================

/// Declarative description of a project's filesystem structure.
///
/// Nodes are processed in order.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// A single node in the template tree: either a file or directory.
#[derive(Debug, Clone)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    /// Unrendered path; may contain `{{VARIABLE}}` tokens.
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }

    pub fn condition(&self) -> &Condition {
        match self {
            Self::File(f) => &f.when,
            Self::Directory(d) => &d.when,
        }
    }
}

/// Specification for a file to create.
///
/// Defaults to read-write (0o644) and unconditional. Use `executable()` for
/// scripts and `when()` to gate the file on the option set.
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub path: RelativePath,
    pub content: TemplateContent,
    pub permissions: Permissions,
    pub when: Condition,
}

impl FileSpec {
    pub fn new(path: RelativePath, content: TemplateContent) -> Self {
        Self {
            path,
            content,
            permissions: Permissions::read_write(),
            when: Condition::Always,
        }
    }

    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }
}

/// Specification for a directory to create.
#[derive(Debug, Clone)]
pub struct DirectorySpec {
    pub path: RelativePath,
    pub permissions: Permissions,
    pub when: Condition,
}

impl DirectorySpec {
    pub fn new(path: RelativePath) -> Self {
        Self {
            path,
            permissions: Permissions::read_write(),
            when: Condition::Always,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }
}

// ============================================================================
// Content Types
// ============================================================================

/// Content specification for a file.
#[derive(Debug, Clone)]
pub enum TemplateContent {
    /// Content used exactly as provided.
    Literal(TemplateSource),

    /// Content with `{{VARIABLE}}` placeholders and blocks to be rendered.
    Parameterized(TemplateSource),
}

impl TemplateContent {
    /// Pick `Parameterized` when the source looks like it has placeholders.
    pub fn detect(source: TemplateSource) -> Self {
        if source.contains_placeholder() {
            Self::Parameterized(source)
        } else {
            Self::Literal(source)
        }
    }
}

/// Source of template content: either compile-time or runtime.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Compile-time string literal (e.g., `include_str!("pyproject.toml")`)
    Static(&'static str),

    /// Runtime-owned string
    Owned(String),
}

impl From<&'static str> for TemplateSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for TemplateSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl TemplateSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    /// Quick heuristic: does the content contain placeholder syntax?
    pub fn contains_placeholder(&self) -> bool {
        self.as_str().contains("{{") && self.as_str().contains("}}")
    }
}
