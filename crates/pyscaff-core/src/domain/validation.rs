use crate::domain::{
    entities::{ProjectStructure, Template},
    error::DomainError,
    identity::{ProjectIdentity, slugify},
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Slugs that would land the package on a fixed top-level directory of
    /// the generated project.
    pub const RESERVED_SLUGS: [&'static str; 3] = ["src", "tests", "docs"];

    /// Check a project name against the identifier rule.
    ///
    /// A name must start with an ASCII letter and contain only ASCII letters,
    /// digits and hyphens, and its slug must not be one of
    /// [`Self::RESERVED_SLUGS`].
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let reject = |reason: &str| {
            Err(DomainError::NameValidation {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };

        let Some(first) = name.chars().next() else {
            return reject("name cannot be empty");
        };

        if first.is_ascii_digit() {
            return reject("name cannot start with a digit");
        }
        if !first.is_ascii_alphabetic() {
            return reject("name must start with a letter");
        }

        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return reject(&format!(
                "'{bad}' is not allowed; use letters, digits and hyphens"
            ));
        }

        let slug = slugify(name);
        if Self::RESERVED_SLUGS.contains(&slug.as_str()) {
            return reject(&format!(
                "'{slug}' is already a directory of the generated project"
            ));
        }

        Ok(())
    }

    /// Validate the name and derive its identity in one step.
    pub fn project_identity(name: &str) -> Result<ProjectIdentity, DomainError> {
        Self::validate_project_name(name)?;
        Ok(ProjectIdentity::from_validated(name))
    }

    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifier_like_names() {
        for name in ["my-project", "MyTool", "a", "data-pipeline2", "x-1-y"] {
            assert!(
                DomainValidator::validate_project_name(name).is_ok(),
                "rejected: {name}"
            );
        }
    }

    #[test]
    fn rejects_underscore() {
        let err = DomainValidator::validate_project_name("my_project").unwrap_err();
        assert!(matches!(err, DomainError::NameValidation { .. }));
    }

    #[test]
    fn rejects_leading_digit_and_symbols() {
        for name in ["", "1project", "-lead", "my project", "my.project", "ünï"] {
            assert!(
                DomainValidator::validate_project_name(name).is_err(),
                "accepted: {name:?}"
            );
        }
    }

    #[test]
    fn rejects_names_clashing_with_fixed_directories() {
        for name in ["src", "tests", "docs", "Src", "TESTS", "Docs"] {
            let err = DomainValidator::validate_project_name(name).unwrap_err();
            assert!(
                matches!(&err, DomainError::NameValidation { reason, .. } if reason.contains("already a directory")),
                "accepted: {name}"
            );
        }
        for name in ["src-tools", "my-tests", "docs2"] {
            assert!(DomainValidator::validate_project_name(name).is_ok(), "rejected: {name}");
        }
    }

    #[test]
    fn identity_uses_validated_name() {
        let id = DomainValidator::project_identity("My-Project").unwrap();
        assert_eq!(id.slug(), "my_project");
        assert_eq!(id.hyphenated(), "my-project");
        assert_eq!(id.name(), "My-Project");
    }
}
