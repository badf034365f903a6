//! Domain value objects: Layout and License.
//!
//! # Design
//!
//! These are pure value types: `Copy` and compared by value.
//! Their string forms are exactly the values declared in the option schema,
//! so `FromStr` accepts what [`crate::domain::EffectiveOptions`] holds.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Layout ───────────────────────────────────────────────────────────────────

/// Where the package directory lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `src/<slug>/`
    Src,
    /// `<slug>/` at the project root
    Flat,
}

impl Layout {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Flat => "flat",
        }
    }

    pub const fn is_src(&self) -> bool {
        matches!(self, Self::Src)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "src" => Ok(Self::Src),
            "flat" => Ok(Self::Flat),
            other => Err(DomainError::InvalidOptionValue {
                option: "layout".into(),
                value: other.into(),
                allowed: vec!["src".into(), "flat".into()],
            }),
        }
    }
}

// ── License ──────────────────────────────────────────────────────────────────

/// License choice, keyed by its schema label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum License {
    Mit,
    Bsd3,
    Isc,
    Apache2,
    Gpl3,
    Proprietary,
}

impl License {
    pub const ALL: [License; 6] = [
        Self::Mit,
        Self::Bsd3,
        Self::Isc,
        Self::Apache2,
        Self::Gpl3,
        Self::Proprietary,
    ];

    /// Label used in the option schema.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mit => "MIT license",
            Self::Bsd3 => "BSD license",
            Self::Isc => "ISC license",
            Self::Apache2 => "Apache Software License 2.0",
            Self::Gpl3 => "GNU General Public License v3",
            Self::Proprietary => "Not open source",
        }
    }

    /// SPDX identifier, `None` for proprietary code.
    pub const fn spdx(&self) -> Option<&'static str> {
        match self {
            Self::Mit => Some("MIT"),
            Self::Bsd3 => Some("BSD-3-Clause"),
            Self::Isc => Some("ISC"),
            Self::Apache2 => Some("Apache-2.0"),
            Self::Gpl3 => Some("GPL-3.0-or-later"),
            Self::Proprietary => None,
        }
    }

    /// Trove classifier for `pyproject.toml`.
    pub const fn classifier(&self) -> &'static str {
        match self {
            Self::Mit => "License :: OSI Approved :: MIT License",
            Self::Bsd3 => "License :: OSI Approved :: BSD License",
            Self::Isc => "License :: OSI Approved :: ISC License (ISCL)",
            Self::Apache2 => "License :: OSI Approved :: Apache Software License",
            Self::Gpl3 => "License :: OSI Approved :: GNU General Public License v3 (GPLv3)",
            Self::Proprietary => "License :: Other/Proprietary License",
        }
    }

    /// Heading every LICENSE file of this kind contains.
    pub const fn title(&self) -> Option<&'static str> {
        match self {
            Self::Mit => Some("MIT License"),
            Self::Bsd3 => Some("BSD 3-Clause License"),
            Self::Isc => Some("ISC License"),
            Self::Apache2 => Some("Apache License"),
            Self::Gpl3 => Some("GNU GENERAL PUBLIC LICENSE"),
            Self::Proprietary => None,
        }
    }

    pub const fn is_open_source(&self) -> bool {
        !matches!(self, Self::Proprietary)
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for License {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.label() == s)
            .ok_or_else(|| DomainError::InvalidOptionValue {
                option: "open_source_license".into(),
                value: s.into(),
                allowed: Self::ALL.iter().map(|l| l.label().to_string()).collect(),
            })
    }
}
