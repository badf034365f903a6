//! Implementation of the `pyscaff new` command.
//!
//! Responsibility: turn CLI arguments and config defaults into a
//! `GenerateRequest`, call the scaffold service, and display results. No
//! business logic lives here.

use std::collections::BTreeMap;
use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use pyscaff_adapters::{GeneratedProject, LocalFilesystem, SimpleRenderer};
use pyscaff_core::{
    application::{
        ContractVerifier, GenerateRequest, GenerationReport, ScaffoldService, VerificationReport,
    },
    domain::{EffectiveOptions, ProjectStructure},
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

use super::verify;

#[derive(Serialize)]
struct NewSummary<'a> {
    #[serde(flatten)]
    report: &'a GenerationReport,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<&'a VerificationReport>,
}

#[derive(Serialize)]
struct DryRunSummary<'a> {
    dry_run: bool,
    root: &'a Path,
    directories: Vec<&'a Path>,
    files: Vec<&'a Path>,
}

/// Execute the `pyscaff new` command.
///
/// Dispatch sequence:
/// 1. Layer config defaults, `-o` overrides and NAME
/// 2. Prompt for every option with `--interactive`
/// 3. Early-exit with the planned tree if `--dry-run`
/// 4. Confirm with the user on a terminal unless `--yes` or `--quiet`
/// 5. Generate via `ScaffoldService`
/// 6. Optionally verify the written tree
#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("-")))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut overrides = super::merge_overrides(&config, &args.options, args.name.as_deref());

    let service = ScaffoldService::new(
        super::template_store(args.template_dir.as_deref(), &config),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );

    if args.interactive {
        overrides = prompt_for_options(&args, &config, &service, overrides)?;
    }

    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let request = GenerateRequest::new(overrides, &output_dir).overwrite(args.force);
    debug!(overrides = ?request.overrides, "Request built");

    if args.dry_run {
        let structure = service.plan(&request)?;
        return show_plan(&structure, &output);
    }

    let options = service.resolve_options(&request.overrides)?;
    if should_confirm(&args, &global, &output) {
        show_configuration(&options, &output_dir, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let spinner = output.spinner(&format!("Generating '{}'...", options.project_name()));
    let generated = service.generate(request);
    spinner.finish_and_clear();
    let report = generated?;

    info!(
        project = %report.identity,
        root = %report.root.display(),
        request_id = %report.request_id,
        "Project generated"
    );

    let verification = if args.verify {
        let project = GeneratedProject::new(&report.root);
        Some(ContractVerifier::verify(&project, &report.options)?)
    } else {
        None
    };

    if output.is_json() {
        output.json(&NewSummary {
            report: &report,
            generated_at: chrono::Local::now().to_rfc3339(),
            verification: verification.as_ref(),
        })?;
    } else {
        print_summary(&report, &output)?;
        if let Some(verification) = &verification {
            output.print("")?;
            verify::print_report(&output, verification)?;
        }
    }

    match &verification {
        Some(verification) => verify::ensure_success(&report.root, verification),
        None => Ok(()),
    }
}

fn should_confirm(args: &NewArgs, global: &GlobalArgs, output: &OutputManager) -> bool {
    !args.yes && !global.quiet && !output.is_json() && std::io::stdin().is_terminal()
}

// ── Interactive prompts ───────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
fn prompt_for_options(
    args: &NewArgs,
    config: &AppConfig,
    service: &ScaffoldService,
    overrides: BTreeMap<String, String>,
) -> CliResult<BTreeMap<String, String>> {
    use dialoguer::{Input, Select};
    use pyscaff_core::application::TemplateService;

    let prompt_failed = |e: dialoguer::Error| CliError::InvalidInput {
        message: format!("prompt failed: {e}"),
        source: Some(Box::new(e)),
    };

    let template =
        TemplateService::new(super::template_store(args.template_dir.as_deref(), config)).load()?;
    let current = service.resolve_options(&overrides)?;
    let mut answers = BTreeMap::new();

    for spec in template.schema.options() {
        let value = current.get(&spec.name).unwrap_or_default().to_string();

        let answer = match spec.choices() {
            Some(choices) => {
                let selected = choices.iter().position(|c| *c == value).unwrap_or(0);
                let index = Select::new()
                    .with_prompt(spec.name.as_str())
                    .items(choices)
                    .default(selected)
                    .interact()
                    .map_err(prompt_failed)?;
                choices[index].clone()
            }
            None => Input::<String>::new()
                .with_prompt(spec.name.as_str())
                .default(value)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_failed)?,
        };

        answers.insert(spec.name.clone(), answer);
    }

    Ok(answers)
}

#[cfg(not(feature = "interactive"))]
fn prompt_for_options(
    _args: &NewArgs,
    _config: &AppConfig,
    _service: &ScaffoldService,
    _overrides: BTreeMap<String, String>,
) -> CliResult<BTreeMap<String, String>> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_plan(structure: &ProjectStructure, out: &OutputManager) -> CliResult<()> {
    let mut files: Vec<&Path> = structure.files().map(|f| f.path.as_path()).collect();
    files.sort();
    let directories: Vec<&Path> = structure.directories().map(|d| d.path.as_path()).collect();

    if out.is_json() {
        out.json(&DryRunSummary {
            dry_run: true,
            root: structure.root(),
            directories,
            files,
        })?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create {} ({} files)",
        structure.root().display(),
        files.len()
    ))?;
    for file in files {
        out.print(&format!("  {}", file.display()))?;
    }
    Ok(())
}

fn show_configuration(
    options: &EffectiveOptions,
    output_dir: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    for (name, value) in options.iter() {
        out.print(&format!("  {name:<20} {value}"))?;
    }
    out.print(&format!("  {:<20} {}", "location", output_dir.display()))?;
    out.print("")?;
    Ok(())
}

fn print_summary(report: &GenerationReport, out: &OutputManager) -> CliResult<()> {
    out.success(&format!(
        "Created '{}' ({} files, {} directories)",
        report.identity.name(),
        report.files,
        report.directories
    ))?;
    out.detail(&format!("  template {}", report.template))?;

    out.print("")?;
    out.print("Next steps:")?;
    out.print(&format!("  cd {}", report.root.display()))?;
    out.print("  make install")?;
    out.print("  make check")?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}
