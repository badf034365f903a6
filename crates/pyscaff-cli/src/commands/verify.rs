//! `pyscaff verify`: check a generated tree against the option contract.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use pyscaff_adapters::{CheckOutcome, GeneratedProject};
use pyscaff_core::{
    application::{ContractVerifier, TemplateService, VerificationReport},
    domain::{EffectiveOptions, keys},
    error::PyscaffError,
};

use crate::{
    cli::VerifyArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Serialize)]
struct VerifySummary<'a> {
    root: &'a Path,
    options: &'a EffectiveOptions,
    #[serde(flatten)]
    report: &'a VerificationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    check: Option<&'a CheckOutcome>,
}

#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: VerifyArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if !args.dir.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("{} is not a directory", args.dir.display()),
            source: None,
        });
    }

    let store = super::template_store(args.template_dir.as_deref(), &config);
    let template = TemplateService::new(store).load()?;

    let overrides = verify_overrides(&config, &args.dir, &args.options)?;
    let options = template
        .schema
        .resolve(&overrides)
        .map_err(PyscaffError::from)?;

    let project = GeneratedProject::new(&args.dir);
    let report = ContractVerifier::verify(&project, &options)?;
    info!(
        passed = report.passed.len(),
        failures = report.failures.len(),
        "Verification finished"
    );

    let check = if args.run_check {
        let spinner = output.spinner("Running make check...");
        let outcome = project.run_check();
        spinner.finish_and_clear();
        Some(outcome?)
    } else {
        None
    };

    if output.is_json() {
        output.json(&VerifySummary {
            root: &args.dir,
            options: &options,
            report: &report,
            check: check.as_ref(),
        })?;
    } else {
        print_report(&output, &report)?;
        if let Some(outcome) = &check {
            print_check(&output, outcome)?;
        }
    }

    ensure_success(&args.dir, &report)?;
    match check {
        Some(outcome) if !outcome.success => Err(CliError::CheckFailed {
            root: args.dir,
            status: outcome.status,
        }),
        _ => Ok(()),
    }
}

/// Config defaults, then the directory name as `project_name`, then `-o`.
fn verify_overrides(
    config: &AppConfig,
    dir: &Path,
    pairs: &[(String, String)],
) -> CliResult<BTreeMap<String, String>> {
    let mut overrides = config.defaults.clone();

    let name = dir
        .canonicalize()
        .map_err(CliError::from)?
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);
    if let Some(name) = name {
        overrides.insert(keys::PROJECT_NAME.to_string(), name);
    }

    overrides.extend(pairs.iter().cloned());
    Ok(overrides)
}

/// One line per passed rule and per failed expectation.
pub fn print_report(output: &OutputManager, report: &VerificationReport) -> CliResult<()> {
    output.header("Contract")?;
    for rule in &report.passed {
        output.success(rule)?;
    }
    for failure in &report.failures {
        output.failure(&failure.to_string())?;
    }
    output.print(&format!(
        "{} passed, {} failed",
        report.passed.len(),
        report.failed_rules().len()
    ))?;
    Ok(())
}

fn print_check(output: &OutputManager, outcome: &CheckOutcome) -> CliResult<()> {
    output.header("make check")?;
    output.detail(outcome.output.trim_end())?;
    if outcome.success {
        output.success("make check passed")?;
    } else {
        output.failure("make check failed")?;
    }
    Ok(())
}

/// Turn a report with failures into [`CliError::VerificationFailed`].
pub fn ensure_success(root: &Path, report: &VerificationReport) -> CliResult<()> {
    if report.is_success() {
        return Ok(());
    }
    Err(CliError::VerificationFailed {
        root: PathBuf::from(root),
        failed: report
            .failed_rules()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
