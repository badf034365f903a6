//! `pyscaff config`: read and write configuration values.

use pyscaff_core::{application::TemplateService, error::PyscaffError};

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, set_value},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = global.config_path();

    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| CliError::ConfigError {
                message: format!("Unknown or unset config key: '{key}'"),
                source: None,
            })?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            if let Some(option) = key.strip_prefix("defaults.") {
                check_option(&config, option, &value)?;
            }
            set_value(&path, &key, &value).map_err(CliError::config)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised = config.to_toml().map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
                output.print(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

/// A config default must name a template option and lie in its domain.
fn check_option(config: &AppConfig, option: &str, value: &str) -> CliResult<()> {
    let store = super::template_store(None, config);
    let template = TemplateService::new(store).load()?;
    template
        .schema
        .check_value(option, value)
        .map_err(|e| CliError::Core(PyscaffError::from(e)))
}
