//! Implementation of the `pyscaff options` command.

use pyscaff_core::{
    application::{TemplateInfo, TemplateService},
    domain::{OptionKind, OptionSpec},
};

use crate::{
    cli::{ListFormat, OptionsArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: OptionsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = super::template_store(args.template_dir.as_deref(), &config);
    let info = TemplateService::new(store).describe()?;

    // --output-format json behaves like --format json.
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => print_table(&info, &config, &output)?,
        ListFormat::List => {
            for option in &info.options {
                output.print(&option.name)?;
            }
        }
        // JSON is the command's result, so it ignores --quiet.
        ListFormat::Json => output.json(&info)?,
    }

    Ok(())
}

fn print_table(info: &TemplateInfo, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("{} ({})", info.name, info.id))?;
    output.detail(&format!(
        "source {}, schema v{}",
        info.location, info.schema_version
    ))?;
    output.print("")?;

    for option in &info.options {
        let overridden = config.defaults.get(&option.name);
        let default = overridden
            .map(String::as_str)
            .unwrap_or_else(|| option.default_value());
        output.print(&format!(
            "  {:<22} {:<28} {}",
            option.name,
            default,
            describe_domain(option)
        ))?;
    }

    if !config.defaults.is_empty() {
        output.print("")?;
        output.detail("Defaults include values from the configuration file.")?;
    }
    Ok(())
}

/// `text` or the choice list, default first.
fn describe_domain(option: &OptionSpec) -> String {
    match &option.kind {
        OptionKind::Text { .. } => "text".to_string(),
        OptionKind::Choice { values } => values.join(" | "),
    }
}
