//! The generation contract: which option values imply which artifacts.
//!
//! This is the checker-side copy of the rules the built-in template encodes
//! in its node conditions and content blocks. Each [`ContractRule`] pairs a
//! [`Condition`] with the [`Expectation`]s that must hold on a generated
//! tree whenever the condition holds. Evaluating expectations needs I/O and
//! lives in the application layer (`ContractVerifier`).

use std::fmt;

use serde::Serialize;

use crate::domain::{
    condition::Condition,
    identity::ProjectIdentity,
    options::{EffectiveOptions, NO, keys},
    value_objects::{Layout, License},
};

/// A single check against a generated tree. Paths are relative to the
/// project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    FileExists(String),
    FileAbsent(String),
    DirExists(String),
    DirAbsent(String),
    /// Neither a file nor a directory exists at the path.
    PathAbsent(String),
    Contains { path: String, needle: String },
    NotContains { path: String, needle: String },
    ValidYaml(String),
    ValidToml(String),
    TomlField {
        path: String,
        /// Dotted key, e.g. `project.name`.
        key: String,
        check: FieldCheck,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Equals(String),
    NonEmpty,
}

impl Expectation {
    fn contains(path: &str, needle: &str) -> Self {
        Self::Contains {
            path: path.into(),
            needle: needle.into(),
        }
    }

    fn not_contains(path: &str, needle: &str) -> Self {
        Self::NotContains {
            path: path.into(),
            needle: needle.into(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileExists(p) => write!(f, "file {p} exists"),
            Self::FileAbsent(p) => write!(f, "file {p} is absent"),
            Self::DirExists(p) => write!(f, "directory {p}/ exists"),
            Self::DirAbsent(p) => write!(f, "directory {p}/ is absent"),
            Self::PathAbsent(p) => write!(f, "nothing exists at {p}"),
            Self::Contains { path, needle } => write!(f, "{path} contains {needle:?}"),
            Self::NotContains { path, needle } => write!(f, "{path} does not contain {needle:?}"),
            Self::ValidYaml(p) => write!(f, "{p} is valid YAML"),
            Self::ValidToml(p) => write!(f, "{p} is valid TOML"),
            Self::TomlField { path, key, check } => match check {
                FieldCheck::Equals(v) => write!(f, "{path}: {key} = {v:?}"),
                FieldCheck::NonEmpty => write!(f, "{path}: {key} is non-empty"),
            },
        }
    }
}

/// A named rule: when `when` holds, every expectation must hold.
#[derive(Debug, Clone)]
pub struct ContractRule {
    pub name: String,
    pub when: Condition,
    pub expect: Vec<Expectation>,
}

impl ContractRule {
    fn new(name: impl Into<String>, when: Condition, expect: Vec<Expectation>) -> Self {
        Self {
            name: name.into(),
            when,
            expect,
        }
    }
}

/// One expectation that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationFailure {
    pub rule: String,
    pub expectation: String,
    pub detail: String,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.rule, self.expectation, self.detail)
    }
}

const PYPROJECT: &str = "pyproject.toml";
const README: &str = "README.md";
const MAKEFILE: &str = "Makefile";
const PRE_COMMIT: &str = ".pre-commit-config.yaml";
const LICENSE_FILE: &str = "LICENSE";
const MAIN_WORKFLOW: &str = ".github/workflows/main.yml";
const DOCS_WORKFLOW: &str = ".github/workflows/docs.yml";
const PUBLISH_WORKFLOW: &str = ".github/workflows/publish.yml";

/// The full rule table for one project identity.
#[derive(Debug, Clone)]
pub struct GenerationContract {
    rules: Vec<ContractRule>,
}

impl GenerationContract {
    pub fn for_identity(identity: &ProjectIdentity) -> Self {
        use Expectation as E;

        let slug = identity.slug();
        let src_pkg = identity.package_dir(true);
        let yes = |option| Condition::enabled(option);
        let no = |option| Condition::equals(option, NO);
        let proprietary = Condition::equals(keys::LICENSE, License::Proprietary.label());
        let hygiene_files = [PYPROJECT, PRE_COMMIT, MAKEFILE];

        let mut rules = vec![
            ContractRule::new(
                "core-files",
                Condition::Always,
                vec![
                    E::FileExists(PYPROJECT.into()),
                    E::FileExists(README.into()),
                    E::FileExists(MAKEFILE.into()),
                    E::FileExists(".gitignore".into()),
                    E::DirExists("tests".into()),
                ],
            ),
            ContractRule::new(
                "license-absent",
                proprietary.clone(),
                vec![E::FileAbsent(LICENSE_FILE.into())],
            ),
            ContractRule::new(
                "docs",
                yes(keys::DOCS),
                vec![
                    E::DirExists("docs".into()),
                    E::FileExists("zensical.toml".into()),
                ],
            ),
            ContractRule::new(
                "docs-absent",
                no(keys::DOCS),
                vec![
                    E::PathAbsent("docs".into()),
                    E::PathAbsent("zensical.toml".into()),
                ],
            ),
            ContractRule::new(
                "layout-src",
                Condition::equals(keys::LAYOUT, Layout::Src.as_str()),
                vec![E::DirExists(src_pkg), E::PathAbsent(slug.into())],
            ),
            ContractRule::new(
                "layout-flat",
                Condition::equals(keys::LAYOUT, Layout::Flat.as_str()),
                vec![E::DirExists(slug.into()), E::PathAbsent("src".into())],
            ),
            ContractRule::new(
                "deptry",
                yes(keys::DEPTRY),
                hygiene_files
                    .iter()
                    .map(|p| E::contains(p, "deptry"))
                    .collect(),
            ),
            ContractRule::new(
                "deptry-absent",
                no(keys::DEPTRY),
                hygiene_files
                    .iter()
                    .map(|p| E::not_contains(p, "deptry"))
                    .collect(),
            ),
            ContractRule::new(
                "ci-workflow",
                yes(keys::INCLUDE_CI),
                vec![
                    E::FileExists(MAIN_WORKFLOW.into()),
                    E::ValidYaml(MAIN_WORKFLOW.into()),
                ],
            ),
            ContractRule::new(
                "docs-workflow",
                Condition::all([yes(keys::INCLUDE_CI), yes(keys::DOCS)]),
                vec![
                    E::FileExists(DOCS_WORKFLOW.into()),
                    E::ValidYaml(DOCS_WORKFLOW.into()),
                ],
            ),
            ContractRule::new(
                "docs-workflow-absent",
                Condition::any([no(keys::INCLUDE_CI), no(keys::DOCS)]),
                vec![E::PathAbsent(DOCS_WORKFLOW.into())],
            ),
            ContractRule::new(
                "no-ci",
                no(keys::INCLUDE_CI),
                vec![E::PathAbsent(".github".into())],
            ),
            ContractRule::new(
                "publish-workflow",
                Condition::all([yes(keys::INCLUDE_CI), yes(keys::PUBLISH_TO_PYPI)]),
                vec![
                    E::FileExists(PUBLISH_WORKFLOW.into()),
                    E::ValidYaml(PUBLISH_WORKFLOW.into()),
                    E::contains(PUBLISH_WORKFLOW, "uv publish"),
                    E::contains(PUBLISH_WORKFLOW, "secrets.PYPI_TOKEN"),
                ],
            ),
            ContractRule::new(
                "publish-workflow-absent",
                Condition::any([no(keys::INCLUDE_CI), no(keys::PUBLISH_TO_PYPI)]),
                vec![E::PathAbsent(PUBLISH_WORKFLOW.into())],
            ),
            ContractRule::new(
                "readme-publish",
                yes(keys::PUBLISH_TO_PYPI),
                vec![
                    E::contains(README, "PYPI_TOKEN"),
                    E::contains(README, "PyPI"),
                ],
            ),
            ContractRule::new(
                "readme-publish-absent",
                no(keys::PUBLISH_TO_PYPI),
                vec![
                    E::not_contains(README, "PYPI_TOKEN"),
                    E::not_contains(README, "PyPI"),
                ],
            ),
            ContractRule::new(
                "manifest-metadata",
                Condition::Always,
                vec![
                    E::ValidToml(PYPROJECT.into()),
                    E::TomlField {
                        path: PYPROJECT.into(),
                        key: "project.name".into(),
                        check: FieldCheck::Equals(identity.hyphenated().into()),
                    },
                    E::TomlField {
                        path: PYPROJECT.into(),
                        key: "project.version".into(),
                        check: FieldCheck::NonEmpty,
                    },
                ],
            ),
            ContractRule::new(
                "pre-commit-config",
                Condition::Always,
                vec![E::FileExists(PRE_COMMIT.into()), E::ValidYaml(PRE_COMMIT.into())],
            ),
        ];

        // One rule per open-source license so the expected title is fixed.
        rules.extend(
            License::ALL
                .into_iter()
                .filter_map(|l| l.title().map(|title| (l, title)))
                .map(|(license, title)| {
                    ContractRule::new(
                        format!("license-{}", license.spdx().unwrap_or("other").to_lowercase()),
                        Condition::equals(keys::LICENSE, license.label()),
                        vec![
                            E::FileExists(LICENSE_FILE.into()),
                            E::contains(LICENSE_FILE, title),
                        ],
                    )
                }),
        );

        Self { rules }
    }

    /// A contract made of arbitrary rules.
    pub fn from_rules(rules: Vec<ContractRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ContractRule] {
        &self.rules
    }

    /// Rules whose condition holds for `options`.
    pub fn applicable<'a>(
        &'a self,
        options: &'a EffectiveOptions,
    ) -> impl Iterator<Item = &'a ContractRule> + 'a {
        self.rules.iter().filter(move |r| r.when.evaluate(options))
    }
}
