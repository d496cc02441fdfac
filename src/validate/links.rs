//! Relative link integrity.
//!
//! Inline links and images (`[text](target)`, `![alt](target)`) are extracted
//! with pulldown-cmark, so links inside code spans and fenced blocks are not
//! checked. Targets with an absolute URL scheme are skipped. Everything else is
//! resolved against the containing document's directory and must exist.
//!
//! A `#fragment` suffix is dropped before resolution; a fragment-only target
//! points into the same document and is always considered resolved. A leading
//! `/` is stripped, so `/x.md` resolves like `x.md` and never reaches outside
//! the tree being checked.

use super::Violation;
use crate::tree::DocumentTree;
use pulldown_cmark::{Event, LinkType, Parser, Tag};
use std::path::Path;
use tracing::warn;

const EXTERNAL_SCHEMES: &[&str] = &["http://", "https://", "mailto:", "ftp://"];

/// Check every relative link in every document of the tree.
///
/// `skip` names a document whose links are not checked (the index being
/// rebuilt in the same run). Violations follow document discovery order, then
/// link order within the document, without deduplication.
pub fn validate_links(tree: &DocumentTree, skip: Option<&Path>) -> Vec<Violation> {
    let mut violations = Vec::new();

    for doc in tree.documents() {
        if skip.is_some_and(|s| s == doc.as_path()) {
            continue;
        }
        let rel = tree.relative(doc);
        match std::fs::read_to_string(doc) {
            Ok(text) => violations.extend(
                broken_links(doc, &text)
                    .into_iter()
                    .map(|target| Violation::BrokenLink {
                        document: rel.clone(),
                        target,
                    }),
            ),
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

/// Literal targets in `text` that do not resolve from `doc`'s directory.
pub fn broken_links(doc: &Path, text: &str) -> Vec<String> {
    let base = doc.parent().unwrap_or(Path::new(""));
    extract_links(text)
        .into_iter()
        .filter(|target| !resolves(base, target))
        .collect()
}

/// All inline link and image targets, excluding absolute URLs, in order.
pub fn extract_links(text: &str) -> Vec<String> {
    Parser::new(text)
        .filter_map(|event| match event {
            Event::Start(Tag::Link {
                link_type: LinkType::Inline,
                dest_url,
                ..
            })
            | Event::Start(Tag::Image {
                link_type: LinkType::Inline,
                dest_url,
                ..
            }) => Some(dest_url.to_string()),
            _ => None,
        })
        .filter(|target| !is_external(target))
        .collect()
}

pub fn is_external(target: &str) -> bool {
    EXTERNAL_SCHEMES.iter().any(|scheme| target.starts_with(scheme))
}

fn resolves(base: &Path, target: &str) -> bool {
    let path = target.split('#').next().unwrap_or_default();
    if path.is_empty() {
        return true;
    }
    let path = path.trim_start_matches('/');
    path.is_empty() || base.join(path).exists()
}
