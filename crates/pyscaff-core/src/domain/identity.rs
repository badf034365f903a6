//! Project identity: names derived from the raw project name.
//!
//! Every function here is pure. The same name always yields the same slug
//! and the same hyphenated distribution name.

use std::fmt;

use serde::Serialize;

/// Normalise a name into a Python-importable slug.
///
/// Lowercases ASCII letters, turns every maximal run of characters that are
/// not ASCII alphanumerics into a single `_`, and strips leading/trailing
/// underscores.
///
/// | Input | Output |
/// |-------|--------|
/// | "my-project" | "my_project" |
/// | "My  Cool--Tool" | "my_cool_tool" |
/// | "--x--" | "x" |
pub fn slugify(name: &str) -> String {
    join_alnum_runs(name, '_')
}

/// Same normalisation as [`slugify`] but joined with `-`.
///
/// This is the distribution name written to `pyproject.toml`.
pub fn hyphenate(name: &str) -> String {
    join_alnum_runs(name, '-')
}

fn join_alnum_runs(input: &str, sep: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(sep);
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    out
}

/// Derived attributes of a validated project name.
///
/// Construct through [`crate::domain::DomainValidator::project_identity`] so the
/// name rule is always applied first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectIdentity {
    name: String,
    slug: String,
    hyphenated: String,
}

impl ProjectIdentity {
    pub(crate) fn from_validated(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: slugify(&name),
            hyphenated: hyphenate(&name),
            name,
        }
    }

    /// The name exactly as the user gave it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package directory / import name, e.g. `my_project`.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Distribution name, e.g. `my-project`.
    pub fn hyphenated(&self) -> &str {
        &self.hyphenated
    }

    /// Relative package directory for the given layout.
    pub fn package_dir(&self, src_layout: bool) -> String {
        if src_layout {
            format!("src/{}", self.slug)
        } else {
            self.slug.clone()
        }
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separator_runs() {
        assert_eq!(slugify("my-project"), "my_project");
        assert_eq!(slugify("My  Cool--Tool"), "my_cool_tool");
        assert_eq!(slugify("a.b/c"), "a_b_c");
    }

    #[test]
    fn slugify_strips_edges() {
        assert_eq!(slugify("--x--"), "x");
        assert_eq!(slugify("___"), "");
    }

    #[test]
    fn slugify_treats_non_ascii_as_separator() {
        assert_eq!(slugify("café-bar"), "caf_bar");
    }

    #[test]
    fn hyphenate_mirrors_slugify() {
        assert_eq!(hyphenate("My_Project"), "my-project");
        assert_eq!(hyphenate("my-project"), "my-project");
    }

    #[test]
    fn package_dir_follows_layout() {
        let id = ProjectIdentity::from_validated("my-project");
        assert_eq!(id.package_dir(true), "src/my_project");
        assert_eq!(id.package_dir(false), "my_project");
    }
}
