//! Flags shared by every subcommand, flattened into [`super::Cli`].

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

use crate::config::AppConfig;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// More log output: `-v` info, `-vv` debug, `-vvv` trace.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors and machine-readable results.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never emit ANSI colour (also set by `NO_COLOR`).
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read configuration from FILE instead of the platform location.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Result rendering; `auto` follows `output.format` from the config.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,

    /// Append JSON log lines to FILE as well as stderr.
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalArgs {
    /// Default `EnvFilter` level for the pyscaff crates.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Whether errors print their cause chain.
    pub fn show_causes(&self) -> bool {
        self.verbose > 0
    }

    /// The configuration file `init` and `config` operate on.
    pub fn config_path(&self) -> PathBuf {
        AppConfig::config_path(self.config.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `output.format` from the config, `human` when unset.
    #[default]
    Auto,
    /// Colours, symbols and spinners.
    Human,
    /// The human text without colours or spinners.
    Plain,
    /// A single JSON document on stdout.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn global(args: &[&str]) -> GlobalArgs {
        let mut argv = vec!["pyscaff"];
        argv.extend_from_slice(args);
        argv.push("options");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(global(&[]).log_level(), "warn");
        assert_eq!(global(&["-v"]).log_level(), "info");
        assert_eq!(global(&["-vv"]).log_level(), "debug");
        assert_eq!(global(&["-vvvvv"]).log_level(), "trace");
        assert_eq!(global(&["-q"]).log_level(), "error");
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pyscaff", "-q", "-v", "options"]).is_err());
    }

    #[test]
    fn explicit_config_path_wins() {
        let args = global(&["--config", "custom.toml"]);
        assert_eq!(args.config_path(), PathBuf::from("custom.toml"));
        assert!(!args.show_causes());
    }
}
