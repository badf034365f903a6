//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "pyscaff",
    bin_name = "pyscaff",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate Python packages managed with uv",
    long_about = "pyscaff renders a ready-to-use Python package (uv, ruff, pytest, \
                  pre-commit, optional docs, CI and PyPI publishing) from a small \
                  set of options, and can verify a generated tree against the \
                  rules those options imply.",
    after_help = "EXAMPLES:\n\
        \x20 pyscaff new my-lib\n\
        \x20 pyscaff new my-lib -o layout=flat -o deptry=n\n\
        \x20 pyscaff options\n\
        \x20 pyscaff verify ./my-lib\n\
        \x20 pyscaff completions bash > /usr/share/bash-completion/completions/pyscaff",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new Python package.
    #[command(
        visible_alias = "n",
        about = "Generate a new Python package",
        after_help = "EXAMPLES:\n\
            \x20 pyscaff new my-lib\n\
            \x20 pyscaff new my-lib --output-dir ~/code -o python_version=3.13\n\
            \x20 pyscaff new my-lib -o include_ci=n --dry-run\n\
            \x20 pyscaff new --interactive"
    )]
    New(NewArgs),

    /// Show the options the template accepts.
    #[command(
        visible_alias = "opts",
        about = "List template options and their defaults",
        after_help = "EXAMPLES:\n\
            \x20 pyscaff options\n\
            \x20 pyscaff options --format json"
    )]
    Options(OptionsArgs),

    /// Check a generated tree against the option contract.
    #[command(
        about = "Verify a generated project",
        after_help = "EXAMPLES:\n\
            \x20 pyscaff verify ./my-lib\n\
            \x20 pyscaff verify ./my-lib -o layout=flat -o zensical=n\n\
            \x20 pyscaff verify ./my-lib --run-check"
    )]
    Verify(VerifyArgs),

    /// Initialise a pyscaff configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 pyscaff init\n\
            \x20 pyscaff init --force\n\
            \x20 pyscaff --config ./pyscaff.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 pyscaff completions bash > ~/.local/share/bash-completion/completions/pyscaff\n\
            \x20 pyscaff completions zsh  > ~/.zfunc/_pyscaff\n\
            \x20 pyscaff completions fish > ~/.config/fish/completions/pyscaff.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the pyscaff configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 pyscaff config get defaults.layout\n\
            \x20 pyscaff config set defaults.author_name \"Ada Lovelace\"\n\
            \x20 pyscaff config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `pyscaff new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name; shorthand for `-o project_name=NAME`.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Option overrides.
    #[arg(
        short = 'o',
        long = "option",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Override a template option (repeatable)"
    )]
    pub options: Vec<(String, String)>,

    /// Directory the project directory is created in.
    #[arg(
        short = 'd',
        long = "output-dir",
        value_name = "DIR",
        help = "Parent directory of the project (default: current directory)"
    )]
    pub output_dir: Option<PathBuf>,

    /// Use an on-disk template instead of the built-in one.
    #[arg(
        long = "template-dir",
        value_name = "DIR",
        help = "Template directory (template.toml + options.json)"
    )]
    pub template_dir: Option<PathBuf>,

    /// Prompt for every option.
    #[arg(
        short = 'i',
        long = "interactive",
        conflicts_with = "yes",
        help = "Prompt for each option"
    )]
    pub interactive: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Replace an existing project directory (destructive).
    #[arg(long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Run the contract verifier on the written tree.
    #[arg(long = "verify", conflicts_with = "dry_run", help = "Verify the generated tree")]
    pub verify: bool,
}

// ── options ───────────────────────────────────────────────────────────────────

/// Arguments for `pyscaff options`.
#[derive(Debug, Args)]
pub struct OptionsArgs {
    /// Describe an on-disk template instead of the built-in one.
    #[arg(long = "template-dir", value_name = "DIR", help = "Template directory")]
    pub template_dir: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `options` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One option name per line.
    List,
    /// JSON document.
    Json,
}

// ── verify ────────────────────────────────────────────────────────────────────

/// Arguments for `pyscaff verify`.
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Root of the generated project.
    #[arg(value_name = "DIR", help = "Generated project directory")]
    pub dir: PathBuf,

    /// Options the tree was generated with; `project_name` defaults to the
    /// directory name.
    #[arg(
        short = 'o',
        long = "option",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Option the project was generated with (repeatable)"
    )]
    pub options: Vec<(String, String)>,

    /// Template whose schema resolves the options.
    #[arg(long = "template-dir", value_name = "DIR", help = "Template directory")]
    pub template_dir: Option<PathBuf>,

    /// Also run `make check` inside the project.
    #[arg(long = "run-check", help = "Run the project's `make check` target")]
    pub run_check: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `pyscaff init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `pyscaff completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `pyscaff config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.layout`.
        key: String,
    },
    /// Set a configuration key in the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

/// Parse `KEY=VALUE`. The value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option name in '{raw}'"));
    }

    Ok((key.to_string(), value.to_string()))
}

// ── tests ─────────────────────────────────────────────────────────────────────
