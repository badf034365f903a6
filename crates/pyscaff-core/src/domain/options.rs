//! Option schema and the option resolver.
//!
//! The schema is a read-only document: an ordered list of options, each with
//! a default. [`OptionSchema::resolve`] merges caller overrides over those
//! defaults and yields an immutable, total [`EffectiveOptions`].

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::domain::error::DomainError;

/// Option names of the built-in Python package template.
pub mod keys {
    pub const PROJECT_NAME: &str = "project_name";
    pub const AUTHOR_NAME: &str = "author_name";
    pub const EMAIL: &str = "email";
    pub const GITHUB_USERNAME: &str = "github_username";
    pub const PROJECT_DESCRIPTION: &str = "project_description";
    pub const VERSION: &str = "version";
    pub const PYTHON_VERSION: &str = "python_version";
    pub const LAYOUT: &str = "layout";
    pub const LICENSE: &str = "open_source_license";
    pub const DOCS: &str = "zensical";
    pub const DEPTRY: &str = "deptry";
    pub const INCLUDE_CI: &str = "include_ci";
    pub const PUBLISH_TO_PYPI: &str = "publish_to_pypi";
}

/// Value of an enabled `y`/`n` option.
pub const YES: &str = "y";
/// Value of a disabled `y`/`n` option.
pub const NO: &str = "n";

/// What values an option accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OptionKind {
    /// Any string; `default` is used when not overridden.
    Text { default: String },
    /// One of an ordered domain; the first value is the default.
    Choice { values: Vec<String> },
}

/// A single named option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: OptionKind,
}

impl OptionSpec {
    pub fn text(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OptionKind::Text {
                default: default.into(),
            },
        }
    }

    pub fn choice<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: OptionKind::Choice {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Default value. Choice options are validated non-empty at schema
    /// construction, so this never returns an empty string for them.
    pub fn default_value(&self) -> &str {
        match &self.kind {
            OptionKind::Text { default } => default,
            OptionKind::Choice { values } => values.first().map_or("", String::as_str),
        }
    }

    /// Allowed values, or `None` for free text.
    pub fn choices(&self) -> Option<&[String]> {
        match &self.kind {
            OptionKind::Text { .. } => None,
            OptionKind::Choice { values } => Some(values),
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        self.choices()
            .is_none_or(|values| values.iter().any(|v| v == value))
    }

    /// `true` for a `y`/`n` choice.
    pub fn is_flag(&self) -> bool {
        self.choices().is_some_and(|values| {
            values.len() == 2 && values.iter().all(|v| v == YES || v == NO)
        })
    }
}

/// The declared option schema of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSchema {
    version: u32,
    options: Vec<OptionSpec>,
}

impl OptionSchema {
    /// Build a schema, checking its invariants.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` if a name repeats, a choice domain is empty or has
    /// duplicates, or `project_name` is missing.
    pub fn new(version: u32, options: Vec<OptionSpec>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for spec in &options {
            if spec.name.is_empty() {
                return Err(DomainError::InvalidSchema("option name cannot be empty".into()));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(DomainError::InvalidSchema(format!(
                    "option '{}' is declared twice",
                    spec.name
                )));
            }
            if let Some(values) = spec.choices() {
                if values.is_empty() {
                    return Err(DomainError::InvalidSchema(format!(
                        "option '{}' has an empty domain",
                        spec.name
                    )));
                }
                let unique: HashSet<_> = values.iter().collect();
                if unique.len() != values.len() {
                    return Err(DomainError::InvalidSchema(format!(
                        "option '{}' lists a value twice",
                        spec.name
                    )));
                }
            }
        }

        if !seen.contains(keys::PROJECT_NAME) {
            return Err(DomainError::InvalidSchema(format!(
                "schema must declare '{}'",
                keys::PROJECT_NAME
            )));
        }

        Ok(Self { version, options })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Options in declaration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// The effective option set when nothing is overridden.
    pub fn defaults(&self) -> EffectiveOptions {
        EffectiveOptions {
            values: self
                .options
                .iter()
                .map(|o| (o.name.clone(), o.default_value().to_string()))
                .collect(),
        }
    }

    /// Check that `value` is acceptable for `option`.
    pub fn check_value(&self, option: &str, value: &str) -> Result<(), DomainError> {
        let spec = self.get(option).ok_or_else(|| DomainError::UnknownOption {
            option: option.to_string(),
        })?;

        if !spec.allows(value) {
            return Err(DomainError::InvalidOptionValue {
                option: option.to_string(),
                value: value.to_string(),
                allowed: spec.choices().map(<[String]>::to_vec).unwrap_or_default(),
            });
        }

        // The project name has its own, stricter rule.
        if spec.choices().is_none() && option != keys::PROJECT_NAME {
            check_text(option, value)?;
        }
        Ok(())
    }

    /// Merge `overrides` over the defaults.
    ///
    /// # Errors
    ///
    /// `UnknownOption` for a key the schema does not declare,
    /// `InvalidOptionValue` for a value outside a choice domain,
    /// `InvalidTextValue` for free text that cannot be embedded in a quoted
    /// TOML or YAML string.
    pub fn resolve(
        &self,
        overrides: &BTreeMap<String, String>,
    ) -> Result<EffectiveOptions, DomainError> {
        let mut values = self.defaults().values;

        for (key, value) in overrides {
            self.check_value(key, value)?;
            debug!(option = %key, value = %value, "override applied");
            values.insert(key.clone(), value.clone());
        }

        Ok(EffectiveOptions { values })
    }
}

/// Free text lands inside double-quoted TOML and YAML strings unescaped.
fn check_text(option: &str, value: &str) -> Result<(), DomainError> {
    let reject = |reason: &str| {
        Err(DomainError::InvalidTextValue {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    };

    if let Some(c) = value.chars().find(|&c| matches!(c, '"' | '\\')) {
        return reject(&format!("'{c}' is not allowed"));
    }
    if value.chars().any(char::is_control) {
        return reject("control characters are not allowed");
    }
    if option == keys::VERSION && value.trim().is_empty() {
        return reject("the version must not be empty");
    }
    Ok(())
}

/// Total, immutable mapping from every option name to one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EffectiveOptions {
    values: BTreeMap<String, String>,
}

impl EffectiveOptions {
    pub fn get(&self, option: &str) -> Option<&str> {
        self.values.get(option).map(String::as_str)
    }

    /// `true` when the option is set to `y`.
    pub fn is_enabled(&self, option: &str) -> bool {
        self.get(option) == Some(YES)
    }

    /// The raw project name. Always present: schemas must declare it.
    pub fn project_name(&self) -> &str {
        self.get(keys::PROJECT_NAME).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
