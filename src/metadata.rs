//! Leading metadata block extraction.
//!
//! Documents carry their metadata as bold field lines directly under the
//! title heading:
//!
//! ```text
//! # Payments Service
//!
//! **Status**: ✅ Production Ready
//! **Version**: 2.1.0
//! **Last Updated**: 2025-06-12
//!
//! ## Overview
//! ...
//! ```
//!
//! ## Block boundaries
//!
//! The parser is a two-state line scanner:
//!
//! - **Before heading**: every line is skipped until the first `# ` line.
//! - **In block**: blank lines and further `# ` lines are skipped, lines
//!   starting with `**` are parsed as `**Field**: value`, and the first
//!   other line (a `## ` section, a paragraph, a list item) ends the block.
//!
//! Bold fields appearing after the block ended are never captured, even if
//! they reuse a required field name. Lines starting with `**` that are not
//! well-formed fields (e.g. a bold sentence) are skipped without ending the
//! block.
//!
//! A field written with an empty value (`**Owner**:`) is still recorded, so
//! presence checks see it; value checks decide what empty means.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const STATUS: &str = "Status";
pub const VERSION: &str = "Version";
pub const LAST_UPDATED: &str = "Last Updated";

/// Field name → value mapping from a document's leading block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocumentMetadata {
    fields: BTreeMap<String, String>,
}

impl DocumentMetadata {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    BeforeHeading,
    InBlock,
}

/// Extract the leading metadata block from document text.
pub fn parse_leading_metadata(text: &str) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();
    let mut state = ScanState::BeforeHeading;

    for raw in text.lines() {
        let line = raw.trim();
        let is_title = line.starts_with("# ");

        match state {
            ScanState::BeforeHeading => {
                if is_title {
                    state = ScanState::InBlock;
                }
            }
            ScanState::InBlock => {
                if line.is_empty() || is_title {
                    continue;
                }
                if !line.starts_with("**") {
                    break;
                }
                if let Some((field, value)) = parse_field_line(line) {
                    metadata.insert(field, value);
                }
            }
        }
    }

    metadata
}

/// Read and parse a document, propagating I/O and encoding failures.
pub fn read_metadata(path: &Path) -> std::io::Result<DocumentMetadata> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_leading_metadata(&text))
}

/// Read and parse a document; unreadable input yields empty metadata.
pub fn read_metadata_lossy(path: &Path) -> DocumentMetadata {
    read_metadata(path).unwrap_or_default()
}

/// Parse a `**Field**: value` line into its trimmed parts.
///
/// The field name must be non-empty and contain no `*`; the colon must follow
/// the closing `**` directly.
fn parse_field_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("**")?;
    let close = rest.find("**")?;
    let field = &rest[..close];
    if field.trim().is_empty() || field.contains('*') {
        return None;
    }
    let value = rest[close + 2..].strip_prefix(':')?;
    Some((field.trim(), value.trim()))
}
