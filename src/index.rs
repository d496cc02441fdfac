//! Documentation index reconstruction.
//!
//! The index is always rebuilt from scratch out of the current tree and
//! written at the repository root. Repeated runs over an unchanged tree
//! produce byte-identical text, and the file is only touched when that text
//! differs from what is on disk.
//!
//! ## Layout
//!
//! ```text
//! # Documentation Index
//!
//! This file contains links to all documentation in the repository.
//!
//! ## Project Root
//!
//! - [README.md](README.md) – ✅ Production Ready – 2025-06-12
//!
//! ## apps
//!
//! - [apps/README.md](apps/README.md) – 🚧 Draft – 2025-06-10
//!
//! ### apps/web
//!
//! - [apps/web/README.md](apps/web/README.md) – 🚧 Draft – 2025-06-15
//!
//! ## Others
//!
//! ### Project Root
//!
//! - [CHANGELOG.md](CHANGELOG.md) – 🚧 Draft – unknown
//!
//! ### apps
//!
//! #### apps/web
//!
//! - [apps/web/notes.md](apps/web/notes.md) – 🚧 Draft – unknown
//! ```
//!
//! READMEs come first, grouped by first path segment and then by second.
//! Every other document follows under "Others" with the same grouping one
//! heading level deeper. Entries within a group are sorted by relative path.

use crate::filter::PathFilter;
use crate::metadata::{LAST_UPDATED, STATUS, read_metadata_lossy};
use crate::tree::{DocumentTree, TreeError, display_path, is_readme, resolve_repo_root};
use crate::validate::extract_links;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_INDEX_FILE: &str = "DOCUMENTATION_INDEX.md";

/// Status shown for documents without a `Status` field.
pub const PLACEHOLDER_STATUS: &str = "🚧 Draft";
/// Date shown for documents without a `Last Updated` field.
pub const PLACEHOLDER_DATE: &str = "unknown";

const TITLE: &str = "# Documentation Index";
const INTRO: &str = "This file contains links to all documentation in the repository.";
const PROJECT_ROOT: &str = "Project Root";
const OTHERS: &str = "Others";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Tree(#[from] TreeError),
}

/// One document line in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    pub status: String,
    pub date: String,
}

impl IndexEntry {
    fn line(&self) -> String {
        format!(
            "- [{}]({}) – {} – {}",
            escape_markdown(&self.path, &['[', ']', '<', '>']),
            link_target(&self.path),
            self.status,
            self.date
        )
    }
}

/// Wrap targets that would otherwise break inline link syntax.
fn link_target(path: &str) -> String {
    if path.contains(|c: char| c.is_whitespace() || "()<>\\".contains(c)) {
        format!("<{}>", escape_markdown(path, &['<', '>']))
    } else {
        path.to_string()
    }
}

/// Backslash-escape `special` characters and backslashes themselves.
fn escape_markdown(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Entries under one top-level directory.
#[derive(Debug, Default)]
struct Section {
    /// Documents exactly one directory deep.
    direct: Vec<IndexEntry>,
    /// Deeper documents keyed by `first/second`.
    nested: BTreeMap<String, Vec<IndexEntry>>,
}

/// Two-level grouping of a set of entries.
#[derive(Debug, Default)]
struct Grouping {
    root: Vec<IndexEntry>,
    sections: BTreeMap<String, Section>,
}

impl Grouping {
    fn insert(&mut self, entry: IndexEntry) {
        let segments: Vec<&str> = entry.path.split('/').collect();
        match segments.as_slice() {
            [_] => self.root.push(entry),
            [first, _] => {
                let first = first.to_string();
                self.sections.entry(first).or_default().direct.push(entry);
            }
            [first, second, ..] => {
                let (first, key) = (first.to_string(), format!("{first}/{second}"));
                self.sections
                    .entry(first)
                    .or_default()
                    .nested
                    .entry(key)
                    .or_default()
                    .push(entry);
            }
            [] => {}
        }
    }

    fn sort(&mut self) {
        let by_path = |a: &IndexEntry, b: &IndexEntry| a.path.cmp(&b.path);
        self.root.sort_by(by_path);
        for section in self.sections.values_mut() {
            section.direct.sort_by(by_path);
            for entries in section.nested.values_mut() {
                entries.sort_by(by_path);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.root.is_empty() && self.sections.is_empty()
    }

    fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.root.iter().chain(
            self.sections
                .values()
                .flat_map(|s| s.direct.iter().chain(s.nested.values().flatten())),
        )
    }

    /// Append heading and list blocks, top headings at `level`.
    fn render(&self, level: usize, blocks: &mut Vec<String>) {
        let heading = |depth: usize, title: &str| format!("{} {title}", "#".repeat(depth));

        if !self.root.is_empty() {
            blocks.push(heading(level, PROJECT_ROOT));
            blocks.push(list(&self.root));
        }
        for (first, section) in &self.sections {
            blocks.push(heading(level, first));
            if !section.direct.is_empty() {
                blocks.push(list(&section.direct));
            }
            for (key, entries) in &section.nested {
                blocks.push(heading(level + 1, key));
                blocks.push(list(entries));
            }
        }
    }
}

fn list(entries: &[IndexEntry]) -> String {
    entries
        .iter()
        .map(IndexEntry::line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The composed index: README hierarchy followed by everything else.
#[derive(Debug, Default)]
pub struct IndexDocument {
    readmes: Grouping,
    others: Grouping,
}

impl IndexDocument {
    pub fn from_entries(entries: impl IntoIterator<Item = IndexEntry>) -> Self {
        let mut doc = Self::default();
        for entry in entries {
            let readme = is_readme(Path::new(&entry.path));
            if readme {
                doc.readmes.insert(entry);
            } else {
                doc.others.insert(entry);
            }
        }
        doc.readmes.sort();
        doc.others.sort();
        doc
    }

    /// Entries in rendered order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.readmes.entries().chain(self.others.entries())
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.readmes.is_empty() && self.others.is_empty()
    }

    pub fn render(&self) -> String {
        let mut blocks = vec![TITLE.to_string(), INTRO.to_string()];
        self.readmes.render(2, &mut blocks);
        if !self.others.is_empty() {
            blocks.push(format!("## {OTHERS}"));
            self.others.render(3, &mut blocks);
        }
        let mut text = blocks.join("\n\n");
        text.push('\n');
        text
    }
}

/// Compose the index for every document in `tree` except `index_path`.
pub fn build_index(tree: &DocumentTree, index_path: &Path) -> IndexDocument {
    let entries = tree
        .documents()
        .iter()
        .filter(|doc| doc.as_path() != index_path)
        .map(|doc| {
            let metadata = read_metadata_lossy(doc);
            let field = |name: &str, placeholder: &str| {
                metadata
                    .get(name)
                    .filter(|v| !v.is_empty())
                    .map_or_else(|| placeholder.to_string(), str::to_string)
            };
            IndexEntry {
                path: display_path(&tree.relative(doc)),
                status: field(STATUS, PLACEHOLDER_STATUS),
                date: field(LAST_UPDATED, PLACEHOLDER_DATE),
            }
        });
    IndexDocument::from_entries(entries)
}

/// Paths linked from an existing index text.
pub fn indexed_paths(text: &str) -> BTreeSet<String> {
    extract_links(text).into_iter().collect()
}

/// A freshly composed index compared against the file on disk.
#[derive(Debug)]
pub struct IndexUpdate {
    pub index_path: PathBuf,
    pub document: IndexDocument,
    pub text: String,
    /// Entries not linked from the previous index, in rendered order.
    pub added: Vec<String>,
    previous: Option<String>,
}

impl IndexUpdate {
    /// Whether the file on disk already holds exactly this text.
    pub fn is_unchanged(&self) -> bool {
        self.previous.as_deref() == Some(self.text.as_str())
    }

    /// Overwrite the index file. Returns false when it was already current.
    pub fn write(&self) -> Result<bool, IndexError> {
        if self.is_unchanged() {
            debug!(path = %self.index_path.display(), "index already up to date");
            return Ok(false);
        }
        fs::write(&self.index_path, &self.text)?;
        info!(
            path = %self.index_path.display(),
            entries = self.document.len(),
            added = self.added.len(),
            "wrote documentation index"
        );
        Ok(true)
    }
}

/// Compose the index for `tree` and diff it against `tree.root()/index_file`.
///
/// `tree` should be scanned at the repository root.
pub fn plan_index(tree: &DocumentTree, index_file: &str) -> IndexUpdate {
    let index_path = tree.root().join(index_file);
    let previous = read_previous(&index_path);
    let document = build_index(tree, &index_path);
    let text = document.render();

    let known = previous.as_deref().map(indexed_paths).unwrap_or_default();
    let added = document
        .entries()
        .filter(|e| !known.contains(&e.path))
        .map(|e| e.path.clone())
        .collect();

    IndexUpdate {
        index_path,
        document,
        text,
        added,
        previous,
    }
}

fn read_previous(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read existing index");
            None
        }
    }
}

/// Rebuild and write the index for the repository containing `start`.
pub fn rebuild(
    start: &Path,
    filter: &PathFilter,
    index_file: &str,
) -> Result<IndexUpdate, IndexError> {
    let repo_root = resolve_repo_root(start)?;
    let tree = DocumentTree::scan(&repo_root, filter)?;
    let update = plan_index(&tree, index_file);
    update.write()?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn sample_tree(root: &Path) {
        write_doc(root, "README.md", &readme("Root", PRODUCTION, "1.0.0", "2025-06-12"));
        write_doc(root, "CHANGELOG.md", "# Changelog\n");
        write_doc(root, "apps/README.md", &readme("Apps", DRAFT, "0.1.0", "2025-06-10"));
        write_doc(root, "apps/web/README.md", &readme("Web", DRAFT, "0.2.0", "2025-06-15"));
        write_doc(root, "apps/web/notes.md", "# Notes\n");
        write_doc(root, "apps/api/README.md", &readme("Api", DRAFT, "0.1.0", "2025-05-01"));
        write_doc(root, "libs/core/README.md", &readme("Core", DRAFT, "0.1.0", "2025-04-01"));
        write_doc(root, "guides/setup.md", "# Setup\n");
    }

    fn plan(root: &Path) -> IndexUpdate {
        plan_index(&scan_tree(root), DEFAULT_INDEX_FILE)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    #[test]
    fn renders_readme_hierarchy_then_others() {
        let tmp = TempDir::new().unwrap();
        sample_tree(tmp.path());

        let text = plan(tmp.path()).text;

        let expected = "\
# Documentation Index

This file contains links to all documentation in the repository.

## Project Root

- [README.md](README.md) – ✅ Production Ready – 2025-06-12

## apps

- [apps/README.md](apps/README.md) – 🚧 Draft – 2025-06-10

### apps/api

- [apps/api/README.md](apps/api/README.md) – 🚧 Draft – 2025-05-01

### apps/web

- [apps/web/README.md](apps/web/README.md) – 🚧 Draft – 2025-06-15

## libs

### libs/core

- [libs/core/README.md](libs/core/README.md) – 🚧 Draft – 2025-04-01

## Others

### Project Root

- [CHANGELOG.md](CHANGELOG.md) – 🚧 Draft – unknown

### apps

#### apps/web

- [apps/web/notes.md](apps/web/notes.md) – 🚧 Draft – unknown

### guides

- [guides/setup.md](guides/setup.md) – 🚧 Draft – unknown
";
        assert_eq!(text, expected);
    }

    #[test]
    fn entries_sorted_by_path_within_group() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "zeta.md", "# Z\n");
        write_doc(tmp.path(), "Alpha.md", "# A\n");
        write_doc(tmp.path(), "beta.md", "# B\n");

        let text = plan(tmp.path()).text;
        let a = line_index(&text, "- [Alpha.md](Alpha.md) – 🚧 Draft – unknown");
        let b = line_index(&text, "- [beta.md](beta.md) – 🚧 Draft – unknown");
        let z = line_index(&text, "- [zeta.md](zeta.md) – 🚧 Draft – unknown");
        assert!(a < b && b < z);
    }

    #[test]
    fn others_section_omitted_when_only_readmes() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "README.md", &readme("Root", DRAFT, "0.1.0", "2025-01-01"));

        let text = plan(tmp.path()).text;
        assert!(!text.contains("## Others"));
        assert!(text.ends_with("2025-01-01\n"));
    }

    #[test]
    fn missing_metadata_uses_placeholders() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "README.md", "# Root\n**Status**: ✅ Production Ready\n**Last Updated**:\n");

        let text = plan(tmp.path()).text;
        assert_eq!(
            line_containing(&text, "[README.md]"),
            "- [README.md](README.md) – ✅ Production Ready – unknown"
        );
    }

    #[test]
    fn paths_with_spaces_use_angle_brackets() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "my notes.md", "# Notes\n");

        let update = plan(tmp.path());
        assert_eq!(
            line_containing(&update.text, "my notes"),
            "- [my notes.md](<my notes.md>) – 🚧 Draft – unknown"
        );
        assert!(indexed_paths(&update.text).contains("my notes.md"));
    }

    #[test]
    fn brackets_in_file_names_are_escaped() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "a]b.md", "# Bracket\n");
        write_doc(tmp.path(), "x<y>.md", "# Angle\n");

        let update = plan(tmp.path());
        assert_eq!(
            line_containing(&update.text, "a\\]b"),
            "- [a\\]b.md](a]b.md) – 🚧 Draft – unknown"
        );
        assert_eq!(
            line_containing(&update.text, "x\\<y"),
            "- [x\\<y\\>.md](<x\\<y\\>.md>) – 🚧 Draft – unknown"
        );
        let linked = indexed_paths(&update.text);
        assert!(linked.contains("a]b.md"));
        assert!(linked.contains("x<y>.md"));

        update.write().unwrap();
        assert!(plan(tmp.path()).added.is_empty());
    }

    // =========================================================================
    // Completeness and idempotence
    // =========================================================================

    #[test]
    fn every_document_appears_once_except_the_index() {
        let tmp = TempDir::new().unwrap();
        sample_tree(tmp.path());
        write_doc(tmp.path(), DEFAULT_INDEX_FILE, "# Documentation Index\n");
        write_doc(tmp.path(), "apps/DOCUMENTATION_INDEX.md", "# Nested\n");

        let tree = scan_tree(tmp.path());
        let update = plan_index(&tree, DEFAULT_INDEX_FILE);

        let listed = indexed_paths(&update.text);
        assert_eq!(update.document.len(), tree.documents().len() - 1);
        assert_eq!(listed.len(), update.document.len());
        assert!(!listed.contains(DEFAULT_INDEX_FILE));
        assert!(listed.contains("apps/DOCUMENTATION_INDEX.md"));
        for doc in tree.documents() {
            let rel = display_path(&tree.relative(doc));
            let count = update.text.matches(&format!("[{rel}]({rel})")).count();
            let expected = usize::from(rel != DEFAULT_INDEX_FILE);
            assert_eq!(count, expected, "{rel}");
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        sample_tree(tmp.path());

        let first = plan(tmp.path());
        assert!(first.write().unwrap());
        let second = plan(tmp.path());

        assert_eq!(first.text, second.text);
        assert!(second.is_unchanged());
        assert!(second.added.is_empty());
        assert!(!second.write().unwrap());
        assert_eq!(
            fs::read_to_string(tmp.path().join(DEFAULT_INDEX_FILE)).unwrap(),
            first.text
        );
    }

    #[test]
    fn stale_index_is_fully_replaced() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "README.md", &readme("Root", DRAFT, "0.1.0", "2025-01-01"));
        write_doc(
            tmp.path(),
            DEFAULT_INDEX_FILE,
            "# Documentation Index\n\n- [deleted.md](deleted.md) – x – y\n",
        );

        let update = plan(tmp.path());
        update.write().unwrap();

        let on_disk = fs::read_to_string(tmp.path().join(DEFAULT_INDEX_FILE)).unwrap();
        assert!(!on_disk.contains("deleted.md"));
        assert_eq!(on_disk, update.text);
    }

    // =========================================================================
    // Notices and placement
    // =========================================================================

    #[test]
    fn notices_list_entries_missing_from_previous_index() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "README.md", &readme("Root", DRAFT, "0.1.0", "2025-01-01"));
        write_doc(tmp.path(), "guide.md", "# Guide\n");
        write_doc(tmp.path(), "apps/README.md", "# Apps\n");
        write_doc(tmp.path(), DEFAULT_INDEX_FILE, "- [README.md](README.md) – old – old\n");

        let update = plan(tmp.path());
        assert_eq!(update.added, ["apps/README.md", "guide.md"]);
    }

    #[test]
    fn without_previous_index_everything_is_new() {
        let tmp = TempDir::new().unwrap();
        sample_tree(tmp.path());

        let update = plan(tmp.path());
        assert_eq!(update.added.len(), update.document.len());
        assert!(!update.is_unchanged());
    }

    #[test]
    fn rebuild_from_subdirectory_writes_at_repo_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        sample_tree(tmp.path());

        let update = rebuild(
            &tmp.path().join("apps/web"),
            &PathFilter::new([".git/"]),
            DEFAULT_INDEX_FILE,
        )
        .unwrap();

        let expected = tmp.path().canonicalize().unwrap().join(DEFAULT_INDEX_FILE);
        assert_eq!(update.index_path, expected);
        assert!(expected.is_file());
        assert!(!tmp.path().join("apps/web").join(DEFAULT_INDEX_FILE).exists());
        assert!(update.text.contains("[README.md](README.md)"));
    }
}
