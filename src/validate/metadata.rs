//! Metadata format enforcement.
//!
//! Each checked document must declare every required field in its leading
//! block, and the well-known fields must have well-formed values:
//!
//! - `Status` must be one of the configured statuses.
//! - `Version` must match the version scheme (`x.y.z`).
//! - `Last Updated`, when non-empty, must match the date format.
//!
//! Violations for one document are reported in that order: missing fields
//! (in required-field order), then status, version, date.

use super::Violation;
use crate::metadata::{DocumentMetadata, LAST_UPDATED, STATUS, VERSION, parse_leading_metadata};
use crate::policy::ValidationPolicy;
use crate::tree::{DocumentTree, is_readme};
use std::path::Path;
use tracing::warn;

/// Check metadata of every non-exempt document in the tree.
pub fn validate_metadata(tree: &DocumentTree, policy: &ValidationPolicy) -> Vec<Violation> {
    let mut violations = Vec::new();

    for doc in tree.documents() {
        if !is_checked(doc, policy) {
            continue;
        }
        let rel = tree.relative(doc);
        match std::fs::read_to_string(doc) {
            Ok(text) => {
                let metadata = parse_leading_metadata(&text);
                violations.extend(check_metadata(&rel, &metadata, policy));
            }
            Err(e) => {
                warn!(document = %doc.display(), error = %e, "could not read document");
                violations.push(Violation::Unreadable {
                    document: rel,
                    reason: e.to_string(),
                });
            }
        }
    }

    violations
}

/// Check one document's parsed metadata against the policy.
pub fn check_metadata(
    document: &Path,
    metadata: &DocumentMetadata,
    policy: &ValidationPolicy,
) -> Vec<Violation> {
    let mut violations: Vec<Violation> = policy
        .required_fields
        .iter()
        .filter(|field| !metadata.contains(field))
        .map(|field| Violation::MissingField {
            document: document.to_path_buf(),
            field: field.clone(),
        })
        .collect();

    if let Some(status) = metadata.get(STATUS)
        && !policy.valid_statuses.iter().any(|s| s == status)
    {
        violations.push(Violation::InvalidStatus {
            document: document.to_path_buf(),
            status: status.to_string(),
            allowed: policy.valid_statuses.clone(),
        });
    }

    if let Some(version) = metadata.get(VERSION)
        && !policy.version_scheme.is_match(version)
    {
        violations.push(Violation::InvalidVersion {
            document: document.to_path_buf(),
            version: version.to_string(),
            expected: policy.version_scheme.expected().to_string(),
        });
    }

    if let Some(date) = metadata.get(LAST_UPDATED)
        && !date.is_empty()
        && !policy.date_format.is_match(date)
    {
        violations.push(Violation::InvalidDate {
            document: document.to_path_buf(),
            date: date.to_string(),
            expected: policy.date_format.expected().to_string(),
        });
    }

    violations
}

fn is_checked(doc: &Path, policy: &ValidationPolicy) -> bool {
    let name = doc
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if policy.is_exempt(&name) {
        return false;
    }
    !policy.readmes_only || is_readme(doc)
}
