//! Contract verification: check a generated tree against the rule table.
//!
//! Rules are evaluated independently. A failed expectation becomes a
//! [`VerificationFailure`] in the report; it is never an error.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    application::ports::ArtifactInspector,
    domain::{
        DomainValidator as validator, EffectiveOptions, Expectation, FieldCheck,
        GenerationContract, VerificationFailure,
    },
    error::PyscaffResult,
};

/// Result of verifying one tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    /// Names of applicable rules whose expectations all held.
    pub passed: Vec<String>,
    /// One entry per failed expectation.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Distinct names of rules with at least one failure.
    pub fn failed_rules(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.failures.iter().map(|f| f.rule.as_str()).collect();
        names.dedup();
        names
    }
}

pub struct ContractVerifier;

impl ContractVerifier {
    /// Verify `inspector` against the contract for `options`.
    ///
    /// # Errors
    ///
    /// Only when the project name in `options` fails the name rule; rule
    /// violations are reported, not returned as errors.
    #[instrument(skip_all, fields(project = %options.project_name()))]
    pub fn verify(
        inspector: &dyn ArtifactInspector,
        options: &EffectiveOptions,
    ) -> PyscaffResult<VerificationReport> {
        let identity = validator::project_identity(options.project_name())?;
        let contract = GenerationContract::for_identity(&identity);
        Ok(Self::verify_with(&contract, inspector, options))
    }

    /// Verify against an explicit contract.
    pub fn verify_with(
        contract: &GenerationContract,
        inspector: &dyn ArtifactInspector,
        options: &EffectiveOptions,
    ) -> VerificationReport {
        let mut report = VerificationReport::default();

        for rule in contract.applicable(options) {
            let before = report.failures.len();

            for expectation in &rule.expect {
                if let Err(detail) = check(inspector, expectation) {
                    report.failures.push(VerificationFailure {
                        rule: rule.name.clone(),
                        expectation: expectation.to_string(),
                        detail,
                    });
                }
            }

            if report.failures.len() == before {
                report.passed.push(rule.name.clone());
            }
        }

        debug!(
            passed = report.passed.len(),
            failures = report.failures.len(),
            "Contract verified"
        );
        report
    }
}

fn check(inspector: &dyn ArtifactInspector, expectation: &Expectation) -> Result<(), String> {
    let present = |p: &str| inspector.exists(Path::new(p));
    let dir = |p: &str| inspector.is_dir(Path::new(p));
    let read = |p: &str| {
        inspector
            .read_to_string(Path::new(p))
            .map_err(|e| e.to_string())
    };

    match expectation {
        Expectation::FileExists(p) => match (present(p), dir(p)) {
            (true, false) => Ok(()),
            (true, true) => Err("is a directory".into()),
            _ => Err("missing".into()),
        },
        Expectation::FileAbsent(p) => match (present(p), dir(p)) {
            (true, false) => Err("present".into()),
            _ => Ok(()),
        },
        Expectation::DirExists(p) => match (present(p), dir(p)) {
            (_, true) => Ok(()),
            (true, false) => Err("is a file".into()),
            _ => Err("missing".into()),
        },
        Expectation::DirAbsent(p) => {
            if dir(p) {
                Err("present".into())
            } else {
                Ok(())
            }
        }
        Expectation::PathAbsent(p) => {
            if present(p) {
                Err("present".into())
            } else {
                Ok(())
            }
        }
        Expectation::Contains { path, needle } => {
            if read(path)?.contains(needle.as_str()) {
                Ok(())
            } else {
                Err("not found".into())
            }
        }
        Expectation::NotContains { path, needle } => {
            let text = read(path)?;
            match text.lines().position(|l| l.contains(needle.as_str())) {
                Some(idx) => Err(format!("found on line {}", idx + 1)),
                None => Ok(()),
            }
        }
        Expectation::ValidYaml(p) => inspector
            .parses_as_yaml(Path::new(p))
            .map_err(|e| e.to_string()),
        Expectation::ValidToml(p) => inspector
            .parses_as_toml(Path::new(p))
            .map_err(|e| e.to_string()),
        Expectation::TomlField { path, key, check } => {
            let value = inspector
                .toml_string(Path::new(path), key)
                .map_err(|e| e.to_string())?;
            match (check, value) {
                (_, None) => Err(format!("{key} is missing")),
                (FieldCheck::Equals(want), Some(got)) if &got == want => Ok(()),
                (FieldCheck::Equals(_), Some(got)) => Err(format!("found {got:?}")),
                (FieldCheck::NonEmpty, Some(got)) if !got.trim().is_empty() => Ok(()),
                (FieldCheck::NonEmpty, Some(_)) => Err("empty".into()),
            }
        }
    }
}
