//! Documentation rule checks.
//!
//! | Check | Input | Output |
//! |---|---|---|
//! | [`presence`] | tree directories + root | one [`Violation::MissingReadme`] per directory |
//! | [`metadata`] | tree documents | missing/invalid field violations per document |
//! | [`links`] | tree documents | one [`Violation::BrokenLink`] per unresolved target |
//! | [`dates`] | tree READMEs | advisory [`DateIssue`]s for outdated parents |
//!
//! Every check reads a shared [`DocumentTree`](crate::tree::DocumentTree) and
//! never fails as a whole: a document that cannot be read becomes a
//! [`Violation::Unreadable`] and the scan continues.

pub mod dates;
pub mod links;
pub mod metadata;
pub mod presence;

pub use dates::{DateIssue, check_date_consistency};
pub use links::{extract_links, validate_links};
pub use metadata::validate_metadata;
pub use presence::validate_presence;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::tree::display_path;

/// A rule failure that counts against the run's exit status.
///
/// Paths are relative to the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    MissingReadme {
        dir: PathBuf,
    },
    MissingField {
        document: PathBuf,
        field: String,
    },
    InvalidStatus {
        document: PathBuf,
        status: String,
        allowed: Vec<String>,
    },
    InvalidVersion {
        document: PathBuf,
        version: String,
        expected: String,
    },
    InvalidDate {
        document: PathBuf,
        date: String,
        expected: String,
    },
    Unreadable {
        document: PathBuf,
        reason: String,
    },
    BrokenLink {
        document: PathBuf,
        target: String,
    },
}

impl Violation {
    /// The directory or document the violation is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Violation::MissingReadme { dir } => dir,
            Violation::MissingField { document, .. }
            | Violation::InvalidStatus { document, .. }
            | Violation::InvalidVersion { document, .. }
            | Violation::InvalidDate { document, .. }
            | Violation::Unreadable { document, .. }
            | Violation::BrokenLink { document, .. } => document,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = display_path(self.path());
        match self {
            Violation::MissingReadme { .. } => write!(f, "Missing README: {path}"),
            Violation::MissingField { field, .. } => {
                write!(f, "Bad metadata in {path}: missing \"{field}\"")
            }
            Violation::InvalidStatus {
                status, allowed, ..
            } => write!(
                f,
                "Bad metadata in {path}: invalid status \"{status}\" (expected one of: {})",
                allowed.join(", ")
            ),
            Violation::InvalidVersion {
                version, expected, ..
            } => write!(
                f,
                "Bad metadata in {path}: invalid version format \"{version}\" (expected {expected})"
            ),
            Violation::InvalidDate { date, expected, .. } => write!(
                f,
                "Bad metadata in {path}: invalid date format \"{date}\" (expected {expected})"
            ),
            Violation::Unreadable { reason, .. } => write!(f, "Could not read {path}: {reason}"),
            Violation::BrokenLink { target, .. } => write!(f, "Broken link in {path}: {target}"),
        }
    }
}
