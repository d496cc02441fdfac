//! Filesystem enumeration of directories and markdown documents.
//!
//! [`DocumentTree::scan`] walks a root once and keeps the filtered directory
//! and document lists, so every validator in a run reads the same snapshot.
//! Enumeration is sorted by file name at every level, which makes discovery
//! order (and therefore report order) deterministic across platforms.
//!
//! Unreadable entries below the root are logged and skipped; only a missing
//! or non-directory root is an error.

use crate::filter::PathFilter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension that makes a file a document.
pub const MARKDOWN_EXTENSION: &str = "md";

/// File name of the per-directory README document.
pub const README_FILE: &str = "README.md";

/// Marker directory identifying the repository root.
const VCS_MARKER: &str = ".git";

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Filtered snapshot of a directory tree.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    root: PathBuf,
    filter: PathFilter,
    root_excluded: bool,
    directories: Vec<PathBuf>,
    documents: Vec<PathBuf>,
}

impl DocumentTree {
    /// Walk `root` and collect every non-excluded directory and document.
    ///
    /// A relative root is made absolute first, so ignore patterns see the
    /// directories it sits in.
    pub fn scan(root: &Path, filter: &PathFilter) -> Result<Self, TreeError> {
        if !root.is_dir() {
            return Err(TreeError::NotADirectory(root.to_path_buf()));
        }
        let root = std::path::absolute(root)?;
        let root = root.as_path();

        let mut directories = Vec::new();
        let mut documents = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && filter.excludes_subtree(e.path())));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if filter.is_excluded(path) {
                continue;
            }
            if entry.file_type().is_dir() {
                directories.push(path.to_path_buf());
            } else if is_markdown(path) && path.is_file() {
                // Follows symlinks, unlike the entry's own file type.
                documents.push(path.to_path_buf());
            }
        }

        debug!(
            root = %root.display(),
            directories = directories.len(),
            documents = documents.len(),
            "scanned document tree"
        );

        Ok(Self {
            root: root.to_path_buf(),
            filter: filter.clone(),
            root_excluded: filter.is_excluded(root),
            directories,
            documents,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Whether the root itself matches an ignore pattern.
    pub fn root_excluded(&self) -> bool {
        self.root_excluded
    }

    /// Every non-excluded directory below the root, root not included.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Every non-excluded markdown file below the root, in discovery order.
    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    /// The README subset of [`documents`](Self::documents).
    pub fn readmes(&self) -> impl Iterator<Item = &Path> {
        self.documents
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| is_readme(p))
    }

    /// `path` relative to the root; `.` for the root itself.
    pub fn relative(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// All non-excluded directories under `root`.
pub fn list_directories(root: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>, TreeError> {
    Ok(DocumentTree::scan(root, filter)?.directories)
}

/// All non-excluded markdown documents under `root`.
pub fn list_documents(root: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>, TreeError> {
    Ok(DocumentTree::scan(root, filter)?.documents)
}

/// Find the authoritative repository root for `start`.
///
/// Walks upward from the canonicalized start directory looking for a `.git`
/// marker. Falls back to the start directory itself when no marker exists.
pub fn resolve_repo_root(start: &Path) -> Result<PathBuf, TreeError> {
    let start = start.canonicalize()?;
    let found = start
        .ancestors()
        .find(|dir| dir.join(VCS_MARKER).exists())
        .map(Path::to_path_buf);
    Ok(found.unwrap_or(start))
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == MARKDOWN_EXTENSION)
}

pub fn is_readme(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == README_FILE)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
