//! End-to-end generation against the built-in template.
//!
//! The named scenarios and every flag combination are generated on disk and
//! in memory and checked against the generation contract. The full choice
//! grid runs in memory only.

use std::collections::BTreeMap;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use pyscaff_adapters::{
    BuiltinStore, GeneratedProject, LocalFilesystem, MemoryFilesystem, SimpleRenderer,
    builtin_templates,
};
use pyscaff_core::{
    application::{
        ArtifactInspector, ContractVerifier, Filesystem, GenerateRequest, ScaffoldService,
        VerificationReport,
    },
    domain::{DomainError, DomainValidator, EffectiveOptions, License, NO, YES, keys, slugify},
    error::PyscaffError,
};

fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn resolve(overrides: &BTreeMap<String, String>) -> EffectiveOptions {
    builtin_templates::python_package()
        .unwrap()
        .schema
        .resolve(overrides)
        .unwrap()
}

fn disk_service() -> ScaffoldService {
    ScaffoldService::new(
        Box::new(BuiltinStore),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    )
}

fn memory_service(fs: &MemoryFilesystem) -> ScaffoldService {
    ScaffoldService::new(
        Box::new(BuiltinStore),
        Box::new(SimpleRenderer::new()),
        Box::new(fs.clone()),
    )
}

fn assert_contract(report: &VerificationReport, label: &str) {
    assert!(
        report.is_success(),
        "{label}: failed rules {:?}\n{:#?}",
        report.failed_rules(),
        report.failures
    );
}

/// The eight combinations of the three flags that shape the tree most.
fn flag_combos() -> Vec<BTreeMap<String, String>> {
    let mut combos = Vec::new();
    for docs in [YES, NO] {
        for ci in [YES, NO] {
            for publish in [YES, NO] {
                combos.push(overrides(&[
                    (keys::DOCS, docs),
                    (keys::INCLUDE_CI, ci),
                    (keys::PUBLISH_TO_PYPI, publish),
                ]));
            }
        }
    }
    combos
}

/// Option sets users actually pick, by name.
fn named_scenarios() -> Vec<(&'static str, BTreeMap<String, String>)> {
    vec![
        ("all-defaults", overrides(&[])),
        ("flat-layout", overrides(&[(keys::LAYOUT, "flat")])),
        (
            "flat-no-docs",
            overrides(&[(keys::LAYOUT, "flat"), (keys::DOCS, NO)]),
        ),
        ("no-docs", overrides(&[(keys::DOCS, NO)])),
        ("no-publish", overrides(&[(keys::PUBLISH_TO_PYPI, NO)])),
        ("proprietary", overrides(&[(keys::LICENSE, "Not open source")])),
        (
            "apache-license",
            overrides(&[(keys::LICENSE, "Apache Software License 2.0")]),
        ),
        (
            "flat-no-publish-no-docs",
            overrides(&[
                (keys::LAYOUT, "flat"),
                (keys::PUBLISH_TO_PYPI, NO),
                (keys::DOCS, NO),
            ]),
        ),
    ]
}

#[test]
fn named_scenarios_satisfy_contract_on_disk_and_in_memory() {
    for (name, combo) in named_scenarios() {
        let out = TempDir::new().unwrap();
        let report = disk_service()
            .generate(GenerateRequest::new(combo.clone(), out.path()))
            .unwrap();
        let on_disk = GeneratedProject::new(&report.root);
        assert_contract(&ContractVerifier::verify(&on_disk, &report.options).unwrap(), name);

        let fs = MemoryFilesystem::new();
        let report = memory_service(&fs)
            .generate(GenerateRequest::new(combo, "/out"))
            .unwrap();
        let in_memory = fs.project(&report.root);
        assert_contract(&ContractVerifier::verify(&in_memory, &report.options).unwrap(), name);
    }
}

#[test]
fn flag_combinations_satisfy_contract_on_disk() {
    for combo in flag_combos() {
        let out = TempDir::new().unwrap();
        let report = disk_service()
            .generate(GenerateRequest::new(combo.clone(), out.path()))
            .unwrap();

        let project = GeneratedProject::new(&report.root);
        let verification = ContractVerifier::verify(&project, &report.options).unwrap();
        assert_contract(&verification, &format!("{combo:?}"));
        assert_eq!(project.files().unwrap().len(), report.files);
    }
}

#[test]
fn flag_combinations_satisfy_contract_in_memory() {
    for combo in flag_combos() {
        let fs = MemoryFilesystem::new();
        let report = memory_service(&fs)
            .generate(GenerateRequest::new(combo.clone(), "/out"))
            .unwrap();

        let verification =
            ContractVerifier::verify(&fs.project(&report.root), &report.options).unwrap();
        assert_contract(&verification, &format!("{combo:?}"));
    }
}

#[test]
fn full_choice_grid_satisfies_contract() {
    let licenses: Vec<&str> = License::ALL.iter().map(License::label).collect();
    let mut generated = 0;

    for layout in ["src", "flat"] {
        for &license in &licenses {
            for deptry in [YES, NO] {
                for docs in [YES, NO] {
                    for ci in [YES, NO] {
                        for publish in [YES, NO] {
                            let combo = overrides(&[
                                (keys::LAYOUT, layout),
                                (keys::LICENSE, license),
                                (keys::DEPTRY, deptry),
                                (keys::DOCS, docs),
                                (keys::INCLUDE_CI, ci),
                                (keys::PUBLISH_TO_PYPI, publish),
                            ]);
                            let fs = MemoryFilesystem::new();
                            let report = memory_service(&fs)
                                .generate(GenerateRequest::new(combo.clone(), "/out"))
                                .unwrap();
                            let verification = ContractVerifier::verify(
                                &fs.project(&report.root),
                                &report.options,
                            )
                            .unwrap();
                            assert_contract(&verification, &format!("{combo:?}"));
                            generated += 1;
                        }
                    }
                }
            }
        }
    }

    assert_eq!(generated, 2 * licenses.len() * 16);
}

#[test]
fn defaults_produce_src_layout_with_docs_and_mit_license() {
    let fs = MemoryFilesystem::new();
    let report = memory_service(&fs)
        .generate(GenerateRequest::new(BTreeMap::new(), "/out"))
        .unwrap();
    let root = Path::new("/out/my-project");
    assert_eq!(report.root, root);

    let license = fs.read_file(&root.join("LICENSE")).unwrap();
    assert!(license.contains("MIT License"));
    assert!(fs.is_dir(&root.join("docs")));
    assert!(fs.is_dir(&root.join("src/my_project")));
    assert!(!fs.exists(&root.join("my_project")));
    assert!(
        fs.read_file(&root.join("src/my_project/__init__.py"))
            .is_some()
    );
}

#[test]
fn flat_layout_without_deptry() {
    let fs = MemoryFilesystem::new();
    let request = GenerateRequest::new(
        overrides(&[(keys::LAYOUT, "flat"), (keys::DEPTRY, NO)]),
        "/out",
    );
    memory_service(&fs).generate(request).unwrap();

    let root = Path::new("/out/my-project");
    assert!(fs.is_dir(&root.join("my_project")));
    assert!(!fs.exists(&root.join("src")));
    for file in ["pyproject.toml", ".pre-commit-config.yaml", "Makefile"] {
        let content = fs.read_file(&root.join(file)).unwrap();
        assert!(!content.contains("deptry"), "{file} mentions deptry");
    }
}

#[test]
fn no_ci_means_no_github_directory() {
    for docs in [YES, NO] {
        for publish in [YES, NO] {
            let fs = MemoryFilesystem::new();
            let request = GenerateRequest::new(
                overrides(&[
                    (keys::INCLUDE_CI, NO),
                    (keys::DOCS, docs),
                    (keys::PUBLISH_TO_PYPI, publish),
                ]),
                "/out",
            );
            memory_service(&fs).generate(request).unwrap();
            assert!(!fs.exists(Path::new("/out/my-project/.github")));
        }
    }
}

#[test]
fn underscore_name_fails_without_output() {
    let out = TempDir::new().unwrap();
    let err = disk_service()
        .generate(GenerateRequest::new(
            overrides(&[(keys::PROJECT_NAME, "my_project")]),
            out.path(),
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        PyscaffError::Domain(DomainError::NameValidation { .. })
    ));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn names_of_fixed_directories_fail_without_output() {
    for layout in ["src", "flat"] {
        for name in ["src", "tests", "docs", "Docs"] {
            let out = TempDir::new().unwrap();
            let err = disk_service()
                .generate(GenerateRequest::new(
                    overrides(&[(keys::PROJECT_NAME, name), (keys::LAYOUT, layout)]),
                    out.path(),
                ))
                .unwrap_err();

            assert!(
                matches!(err, PyscaffError::Domain(DomainError::NameValidation { .. })),
                "{name} ({layout}): {err:?}"
            );
            assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
        }
    }
}

#[test]
fn text_that_would_break_the_manifest_fails_without_output() {
    for (key, value) in [
        (keys::AUTHOR_NAME, r#"Jane "JD" Doe"#),
        (keys::PROJECT_DESCRIPTION, r"a\b"),
        (keys::EMAIL, "jane@example.com\n"),
        (keys::VERSION, ""),
    ] {
        let out = TempDir::new().unwrap();
        let err = disk_service()
            .generate(GenerateRequest::new(overrides(&[(key, value)]), out.path()))
            .unwrap_err();

        assert!(
            matches!(&err, PyscaffError::Domain(DomainError::InvalidTextValue { option, .. }) if option == key),
            "{key}={value:?}: {err:?}"
        );
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}

#[test]
fn accepted_text_renders_a_parseable_manifest() {
    let fs = MemoryFilesystem::new();
    let report = memory_service(&fs)
        .generate(GenerateRequest::new(
            overrides(&[
                (keys::AUTHOR_NAME, "Seán O'Neil"),
                (keys::PROJECT_DESCRIPTION, "Fast: [toml] & {yaml} # safe"),
                (keys::VERSION, "1.2.3rc1"),
            ]),
            "/out",
        ))
        .unwrap();

    let project = fs.project(&report.root);
    let manifest = Path::new("pyproject.toml");
    assert_eq!(
        project.toml_string(manifest, "project.version").unwrap().as_deref(),
        Some("1.2.3rc1")
    );
    assert_eq!(
        project.toml_string(manifest, "project.description").unwrap().as_deref(),
        Some("Fast: [toml] & {yaml} # safe")
    );
    assert_contract(&ContractVerifier::verify(&project, &report.options).unwrap(), "text");
}

#[test]
fn copyleft_and_apache_licenses_ship_full_text() {
    for (label, title) in [
        ("GNU General Public License v3", "GNU GENERAL PUBLIC LICENSE"),
        ("Apache Software License 2.0", "Apache License"),
    ] {
        let fs = MemoryFilesystem::new();
        let report = memory_service(&fs)
            .generate(GenerateRequest::new(
                overrides(&[(keys::LICENSE, label), (keys::AUTHOR_NAME, "Jane Doe")]),
                "/out",
            ))
            .unwrap();

        let text = fs.read_file(&report.root.join("LICENSE")).unwrap();
        assert!(text.trim_start().starts_with(title), "{label}");
        assert!(text.contains("TERMS AND CONDITIONS"), "{label}");
        assert!(text.contains("END OF TERMS AND CONDITIONS"), "{label}");
        assert!(text.contains("Jane Doe"), "{label}");
        assert!(!text.contains("{{"), "{label}");
        assert!(text.lines().count() > 150, "{label}");
    }
}

#[test]
fn unknown_option_fails_before_rendering() {
    let fs = MemoryFilesystem::new();
    let err = memory_service(&fs)
        .generate(GenerateRequest::new(overrides(&[("colour", "blue")]), "/out"))
        .unwrap_err();

    assert!(matches!(err, PyscaffError::Domain(ref e) if e.is_invalid_option()));
    assert!(fs.list_files().is_empty());
}

#[test]
fn generated_manifest_uses_hyphenated_name() {
    let fs = MemoryFilesystem::new();
    memory_service(&fs)
        .generate(GenerateRequest::new(
            overrides(&[(keys::PROJECT_NAME, "DataTools")]),
            "/out",
        ))
        .unwrap();

    let project = fs.project("/out/DataTools");
    assert_eq!(
        project
            .toml_string(Path::new("pyproject.toml"), "project.name")
            .unwrap()
            .as_deref(),
        Some("datatools")
    );
    assert!(fs.is_dir(Path::new("/out/DataTools/src/datatools")));
}

#[test]
fn plan_matches_generated_tree() {
    let fs = MemoryFilesystem::new();
    let service = memory_service(&fs);
    let request = GenerateRequest::new(overrides(&[(keys::DOCS, NO)]), "/out");

    let planned = service.plan(&request).unwrap();
    assert!(fs.list_files().is_empty());

    let report = service.generate(request).unwrap();
    assert_eq!(planned.file_count(), report.files);
    let written = fs.project(&report.root).files();
    let mut expected: Vec<_> = planned.files().map(|f| f.path.clone()).collect();
    expected.sort();
    assert_eq!(written, expected);
}

#[test]
fn options_resolve_to_schema_defaults() {
    let options = resolve(&BTreeMap::new());
    assert_eq!(options.project_name(), "my-project");
    assert_eq!(options.get(keys::LICENSE), Some("MIT license"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any valid name renders a tree whose manifest carries the hyphenated name.
    #[test]
    fn valid_names_render_valid_manifests(
        name in "[A-Za-z][A-Za-z0-9-]{0,20}".prop_filter("slug names a fixed directory", |name| {
            !DomainValidator::RESERVED_SLUGS.contains(&slugify(name).as_str())
        })
    ) {
        let fs = MemoryFilesystem::new();
        let request = GenerateRequest::new(overrides(&[(keys::PROJECT_NAME, name.as_str())]), "/out");
        let report = memory_service(&fs).generate(request).unwrap();

        let verification =
            ContractVerifier::verify(&fs.project(&report.root), &report.options).unwrap();
        prop_assert!(verification.is_success(), "{:?}", verification.failed_rules());
    }
}

/// Runs the generated project's own quality gate. Needs `uv` and `make`.
#[test]
#[ignore = "requires uv, make and network access"]
fn generated_project_passes_make_check() {
    let out = TempDir::new().unwrap();
    let report = disk_service()
        .generate(GenerateRequest::new(BTreeMap::new(), out.path()))
        .unwrap();

    let project = GeneratedProject::new(&report.root);
    let install = project.run_make("install").unwrap();
    assert!(install.success, "{}", install.output);
    let check = project.run_check().unwrap();
    assert!(check.success, "{}", check.output);
}
