//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags and `-o KEY=VALUE` overrides (applied at the call-site)
//! 2. Environment variables: `PYSCAFF_OUTPUT__NO_COLOR=true`,
//!    `PYSCAFF_DEFAULTS__LAYOUT=flat`, ...
//! 3. Config file (`--config FILE`, else the platform config directory)
//! 4. Built-in defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "PYSCAFF";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Option values applied below `-o` overrides, e.g. `author_name`.
    pub defaults: BTreeMap<String, String>,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template directory used instead of the built-in template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = Self::config_path(config_file);
        debug!(path = %path.display(), explicit = config_file.is_some(), "Loading configuration");

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(config_file.is_some()),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("reading configuration from {}", path.display()))?;

        config
            .try_deserialize()
            .context("configuration has an unexpected shape")
    }

    /// Path of the configuration file in use.
    ///
    /// `--config` wins; otherwise `config.toml` in the platform config
    /// directory, falling back to `.pyscaff.toml` in the current directory.
    pub fn config_path(explicit: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = explicit {
            return path.clone();
        }
        directories::ProjectDirs::from("io", "pyscaff", "pyscaff")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".pyscaff.toml"))
    }

    /// Value of a dotted key, as shown by `config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "output.no_color" => Some(self.output.no_color.to_string()),
            "output.format" => Some(self.output.format.clone()),
            "templates.local_path" => Some(
                self.templates
                    .local_path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => key
                .strip_prefix("defaults.")
                .and_then(|option| self.defaults.get(option).cloned()),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Set `key` to `value` in the TOML document at `path`, creating the file if
/// needed. Returns the configuration the edited document describes.
///
/// `output.no_color` takes a boolean; every other key takes a string.
pub fn set_value(path: &Path, key: &str, value: &str) -> anyhow::Result<AppConfig> {
    let mut document: toml::Table = match std::fs::read_to_string(path) {
        Ok(text) => toml::from_str(&text)
            .with_context(|| format!("{} is not valid TOML", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    let (section, field) = key
        .split_once('.')
        .filter(|(s, f)| !s.is_empty() && !f.is_empty() && !f.contains('.'))
        .with_context(|| format!("'{key}' is not a SECTION.KEY path"))?;

    let new_value = match key {
        "output.no_color" => toml::Value::Boolean(
            value
                .parse()
                .with_context(|| format!("'{value}' is not true or false"))?,
        ),
        "output.format" | "templates.local_path" => toml::Value::String(value.into()),
        _ if section == "defaults" => toml::Value::String(value.into()),
        _ => anyhow::bail!("unknown configuration key '{key}'"),
    };

    let table = document
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .with_context(|| format!("[{section}] in {} is not a table", path.display()))?;
    table.insert(field.to_string(), new_value);

    let text = toml::to_string_pretty(&document)?;
    let config: AppConfig = toml::from_str(&text).context("edited configuration is invalid")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;

    Ok(config)
}
