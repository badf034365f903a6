//! Property-based tests for the option resolver and project identity.
//!
//! These tests use proptest to verify invariants hold across randomly
//! generated names and option sets.

use std::collections::BTreeMap;

use proptest::prelude::*;

use pyscaff_core::domain::{
    Condition, DomainError, DomainValidator, NO, OptionSchema, OptionSpec, YES, hyphenate, keys,
    slugify,
};

/// Strategy for names that satisfy the identifier rule.
fn valid_project_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9-]{0,30}".prop_filter("slug names a fixed directory", |name| {
        !DomainValidator::RESERVED_SLUGS.contains(&slugify(name).as_str())
    })
}

fn flag() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![YES, NO])
}

fn schema() -> OptionSchema {
    OptionSchema::new(
        2,
        vec![
            OptionSpec::text(keys::PROJECT_NAME, "my-project"),
            OptionSpec::choice(keys::LAYOUT, ["src", "flat"]),
            OptionSpec::choice(keys::DOCS, [YES, NO]),
            OptionSpec::choice(keys::INCLUDE_CI, [YES, NO]),
            OptionSpec::choice(keys::PUBLISH_TO_PYPI, [YES, NO]),
        ],
    )
    .unwrap()
}

proptest! {
    /// Slugifying twice changes nothing.
    #[test]
    fn slugify_is_idempotent(name in ".{0,40}") {
        let once = slugify(&name);
        prop_assert_eq!(slugify(&once), once);
    }

    /// Slugs are lowercase identifiers without edge or doubled underscores.
    #[test]
    fn slug_shape(name in ".{0,40}") {
        let slug = slugify(&name);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(!slug.starts_with('_') && !slug.ends_with('_'));
        prop_assert!(!slug.contains("__"));
    }

    /// Every valid name yields an identity whose two spellings agree.
    #[test]
    fn valid_names_produce_identity(name in valid_project_name()) {
        let identity = DomainValidator::project_identity(&name).unwrap();
        prop_assert_eq!(identity.hyphenated(), hyphenate(&name));
        prop_assert_eq!(identity.slug(), identity.hyphenated().replace('-', "_"));
        prop_assert_eq!(identity.name(), name.as_str());
    }

    /// An underscore anywhere fails the name rule.
    #[test]
    fn underscores_are_rejected(head in "[A-Za-z][A-Za-z0-9]{0,10}", tail in "[A-Za-z0-9]{0,10}") {
        let name = format!("{head}_{tail}");
        let is_name_error = matches!(
            DomainValidator::validate_project_name(&name),
            Err(DomainError::NameValidation { .. })
        );
        prop_assert!(is_name_error);
    }

    /// Fixed top-level directory names fail in any letter case.
    #[test]
    fn reserved_slugs_fail_in_any_case(
        reserved in prop::sample::select(DomainValidator::RESERVED_SLUGS.to_vec()),
        upper in prop::collection::vec(any::<bool>(), 5),
    ) {
        let name: String = reserved
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();
        let is_name_error = matches!(
            DomainValidator::validate_project_name(&name),
            Err(DomainError::NameValidation { .. })
        );
        prop_assert!(is_name_error, "{} was accepted", name);
    }

    /// A leading digit fails the name rule.
    #[test]
    fn leading_digit_is_rejected(name in "[0-9][A-Za-z0-9-]{0,20}") {
        prop_assert!(DomainValidator::validate_project_name(&name).is_err());
    }

    /// Options not overridden keep their defaults.
    #[test]
    fn unspecified_options_equal_defaults(
        layout in prop::option::of(prop::sample::select(vec!["src", "flat"])),
        docs in prop::option::of(flag()),
    ) {
        let mut overrides = BTreeMap::new();
        if let Some(v) = layout {
            overrides.insert(keys::LAYOUT.to_string(), v.to_string());
        }
        if let Some(v) = docs {
            overrides.insert(keys::DOCS.to_string(), v.to_string());
        }

        let schema = schema();
        let defaults = schema.defaults();
        let resolved = schema.resolve(&overrides).unwrap();

        for (name, value) in resolved.iter() {
            match overrides.get(name) {
                Some(v) => prop_assert_eq!(value, v.as_str()),
                None => prop_assert_eq!(Some(value), defaults.get(name)),
            }
        }
        prop_assert_eq!(resolved.len(), defaults.len());
    }

    /// The publish-workflow predicate and its absence predicate never agree.
    #[test]
    fn joint_predicate_and_its_complement_are_exclusive(ci in flag(), publish in flag()) {
        let overrides = BTreeMap::from([
            (keys::INCLUDE_CI.to_string(), ci.to_string()),
            (keys::PUBLISH_TO_PYPI.to_string(), publish.to_string()),
        ]);
        let options = schema().resolve(&overrides).unwrap();

        let present = Condition::all([
            Condition::enabled(keys::INCLUDE_CI),
            Condition::enabled(keys::PUBLISH_TO_PYPI),
        ]);
        let absent = Condition::any([
            Condition::equals(keys::INCLUDE_CI, NO),
            Condition::equals(keys::PUBLISH_TO_PYPI, NO),
        ]);

        prop_assert_ne!(present.evaluate(&options), absent.evaluate(&options));
        prop_assert_eq!(present.evaluate(&options), ci == YES && publish == YES);
    }
}
