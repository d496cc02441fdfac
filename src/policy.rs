//! Validation policy: which fields are required and what their values may be.
//!
//! The policy is derived from [`DocmanConfig`](crate::config::DocmanConfig)
//! once per run and handed to the metadata validator and the README template
//! generator, so both always agree on what a valid document looks like.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Documents that never carry a metadata block.
pub const DEFAULT_EXEMPT_FILES: &[&str] = &["CHANGELOG.md", "LICENSE.md"];

static SEMVER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Accepted version string format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionScheme {
    /// `x.y.z`, digits only.
    #[default]
    #[serde(rename = "semantic")]
    Semantic,
}

impl VersionScheme {
    pub fn is_match(self, version: &str) -> bool {
        match self {
            VersionScheme::Semantic => SEMVER.is_match(version),
        }
    }

    /// Human-readable shape, used in violation messages.
    pub fn expected(self) -> &'static str {
        match self {
            VersionScheme::Semantic => "x.y.z",
        }
    }
}

/// Accepted `Last Updated` format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

impl DateFormat {
    pub fn is_match(self, date: &str) -> bool {
        match self {
            DateFormat::Iso => ISO_DATE.is_match(date),
        }
    }

    pub fn expected(self) -> &'static str {
        match self {
            DateFormat::Iso => "YYYY-MM-DD",
        }
    }

    /// `chrono` format string for parsing and rendering.
    pub fn chrono_format(self) -> &'static str {
        match self {
            DateFormat::Iso => "%Y-%m-%d",
        }
    }
}

/// Rules applied to each document's metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Fields every checked document must declare, in reporting order.
    pub required_fields: Vec<String>,
    /// Allowed `Status` values. The first one seeds new README templates.
    pub valid_statuses: Vec<String>,
    pub version_scheme: VersionScheme,
    pub date_format: DateFormat,
    /// File names skipped by metadata validation.
    pub exempt_files: BTreeSet<String>,
    /// Only README documents are checked when set.
    pub readmes_only: bool,
}

impl ValidationPolicy {
    pub fn is_exempt(&self, file_name: &str) -> bool {
        self.exempt_files.contains(file_name)
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        crate::config::DocmanConfig::default().policy()
    }
}
