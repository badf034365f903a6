//! Declarative predicates over an effective option set.
//!
//! Template nodes and contract rules both carry a [`Condition`]. Joint
//! predicates (CI and docs, CI and publishing) are written with
//! [`Condition::all`] so they stay explicit and testable on their own.

use std::fmt;

use crate::domain::{
    error::DomainError,
    options::{EffectiveOptions, OptionSchema, YES},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    #[default]
    Always,
    Equals {
        option: String,
        value: String,
    },
    NotEquals {
        option: String,
        value: String,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn equals(option: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            option: option.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(option: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotEquals {
            option: option.into(),
            value: value.into(),
        }
    }

    /// Shorthand for `option == "y"`.
    pub fn enabled(option: impl Into<String>) -> Self {
        Self::equals(option, YES)
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    /// Evaluate against an option set. A missing option never equals
    /// anything.
    pub fn evaluate(&self, options: &EffectiveOptions) -> bool {
        match self {
            Self::Always => true,
            Self::Equals { option, value } => options.get(option) == Some(value.as_str()),
            Self::NotEquals { option, value } => options.get(option) != Some(value.as_str()),
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(options)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(options)),
            Self::Not(inner) => !inner.evaluate(options),
        }
    }

    /// Check every referenced option exists and every compared value is in
    /// its domain.
    pub fn validate_against(&self, schema: &OptionSchema) -> Result<(), DomainError> {
        match self {
            Self::Always => Ok(()),
            Self::Equals { option, value } | Self::NotEquals { option, value } => {
                schema.check_value(option, value).map_err(|e| {
                    DomainError::InvalidTemplate(format!("condition `{self}`: {e}"))
                })
            }
            Self::All(conditions) | Self::Any(conditions) => conditions
                .iter()
                .try_for_each(|c| c.validate_against(schema)),
            Self::Not(inner) => inner.validate_against(schema),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, items: &[Condition], op: &str| {
            f.write_str("(")?;
            for (i, c) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                write!(f, "{c}")?;
            }
            f.write_str(")")
        };

        match self {
            Self::Always => f.write_str("always"),
            Self::Equals { option, value } => write!(f, "{option} == {value:?}"),
            Self::NotEquals { option, value } => write!(f, "{option} != {value:?}"),
            Self::All(items) => join(f, items, "and"),
            Self::Any(items) => join(f, items, "or"),
            Self::Not(inner) => write!(f, "not {inner}"),
        }
    }
}
