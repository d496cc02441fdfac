//! Shared test utilities for the docman test suite.
//!
//! Provides fixture setup, document writers, and lookup helpers that panic
//! with a clear message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_doc(tmp.path(), "apps/README.md", &readme("Apps", DRAFT, "0.1.0", "2025-06-10"));
//!
//! let tree = scan_tree(tmp.path());
//! assert_eq!(messages(&validate_presence(&tree)), ["Missing README: ."]);
//! ```

use std::fmt::Display;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::filter::PathFilter;
use crate::tree::DocumentTree;

pub const PRODUCTION: &str = "✅ Production Ready";
pub const DRAFT: &str = "🚧 Draft";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Document writers
// =========================================================================

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_doc(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// A document with a complete leading metadata block.
pub fn readme(title: &str, status: &str, version: &str, date: &str) -> String {
    format!(
        "# {title}\n\n**Status**: {status}\n**Version**: {version}\n**Last Updated**: {date}\n\n## Overview\n\nText.\n"
    )
}

/// Scan with no ignore patterns.
pub fn scan_tree(root: &Path) -> DocumentTree {
    DocumentTree::scan(root, &PathFilter::default()).unwrap()
}

// =========================================================================
// Extractors
// =========================================================================

/// Display strings of a report list, in order.
pub fn messages<T: Display>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Find the single line of `text` containing `needle`. Panics if absent.
pub fn line_containing<'a>(text: &'a str, needle: &str) -> &'a str {
    text.lines()
        .find(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("no line containing '{needle}' in:\n{text}"))
}

/// Index of the first line equal to `line`. Panics if absent.
pub fn line_index(text: &str, line: &str) -> usize {
    text.lines()
        .position(|l| l == line)
        .unwrap_or_else(|| panic!("line '{line}' not found in:\n{text}"))
}
