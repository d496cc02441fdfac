//! Ignore-pattern evaluation shared by every scan.
//!
//! A [`PathFilter`] is built once from the configured pattern set and then
//! asked about individual paths. Patterns come in three kinds:
//!
//! | Pattern | Kind | Matches |
//! |---------|------|---------|
//! | `node_modules` | bare segment | any path component equal to the pattern |
//! | `node_modules/`, `docs/drafts/` | directory prefix | the pattern's segments appearing contiguously anywhere in the path |
//! | `*.log`, `draft-?.md` | glob | the final path segment only |
//!
//! A pattern is a glob as soon as it contains a wildcard (`*`, `?` or `[`),
//! regardless of a trailing slash. Evaluation is order-independent: any single
//! match excludes the path.
//!
//! Paths are evaluated as given. `.` contributes no segment, so callers pass
//! absolute paths (the tree scan makes its root absolute), and a root that
//! itself sits inside an excluded tree is excluded exactly like any of its
//! subdirectories.

use std::collections::BTreeSet;
use std::path::{Component, Path};
use tracing::warn;

const WILDCARDS: &[char] = &['*', '?', '['];

/// Compiled ignore rules.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    segments: BTreeSet<String>,
    dir_prefixes: Vec<String>,
    globs: Vec<glob::Pattern>,
    /// Wildcard patterns that failed to compile; compared literally against
    /// the final segment instead.
    literal_names: BTreeSet<String>,
}

impl PathFilter {
    /// Classify and compile a set of ignore patterns.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for raw in patterns {
            let pattern = raw.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            if pattern.contains(WILDCARDS) {
                match glob::Pattern::new(pattern) {
                    Ok(compiled) => filter.globs.push(compiled),
                    Err(e) => {
                        warn!(pattern, error = %e, "invalid glob ignore pattern, matching literally");
                        filter.literal_names.insert(pattern.to_string());
                    }
                }
            } else if let Some(prefix) = pattern.strip_suffix('/') {
                let prefix = prefix.trim_matches('/');
                if !prefix.is_empty() {
                    filter.dir_prefixes.push(prefix.to_string());
                }
            } else {
                filter.segments.insert(pattern.to_string());
            }
        }
        filter
    }

    /// Returns true if `path` is excluded from all scanning.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excludes_subtree(path) || self.matches_final_segment(path)
    }

    /// Returns true if `path` and everything beneath it is excluded.
    ///
    /// Segment and directory-prefix rules are inherited by descendants; glob
    /// rules are not, since they only look at the final segment. The tree
    /// walker uses this to prune without changing which paths are reported.
    pub fn excludes_subtree(&self, path: &Path) -> bool {
        let segments = normal_segments(path);
        if segments.iter().any(|s| self.segments.contains(s)) {
            return true;
        }
        if self.dir_prefixes.is_empty() {
            return false;
        }
        let haystack = format!("/{}/", segments.join("/"));
        self.dir_prefixes
            .iter()
            .any(|prefix| haystack.contains(&format!("/{prefix}/")))
    }

    fn matches_final_segment(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        self.literal_names.contains(name.as_ref()) || self.globs.iter().any(|g| g.matches(&name))
    }
}

/// Path components as strings, skipping root, prefix and `.` components.
fn normal_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect()
}
