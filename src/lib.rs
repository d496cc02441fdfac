//! # Docman
//!
//! Keeps a documentation tree honest. Every directory carries a README with
//! a small metadata block, every relative link resolves, parents are not
//! dated before their children, and one generated index lists every
//! document in the repository.
//!
//! # Architecture: One Scan, Four Checks, One Index
//!
//! ```text
//! 1. Scan      root/      →  DocumentTree          (filtered directories + documents)
//! 2. Validate  tree       →  violations, issues    (presence, metadata, links, dates)
//! 3. Index     repo root  →  DOCUMENTATION_INDEX.md (full rebuild, idempotent)
//! ```
//!
//! The tree is walked once per run and shared by reference. Checks never
//! fail as a whole: an unreadable document becomes a violation and the run
//! moves on. Only the index write touches the filesystem, and only when the
//! composed text differs from what is already there.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`filter`] | Ignore patterns: bare segments, `dir/` prefixes, final-segment globs |
//! | [`tree`] | Filtered traversal, README helpers, repository root discovery |
//! | [`metadata`] | Leading `**Field**: value` block parser |
//! | [`policy`] | Required fields, allowed statuses, version and date formats |
//! | [`validate`] | README presence, metadata, link and date-consistency checks |
//! | [`index`] | Grouped documentation index composition and writing |
//! | [`template`] | README skeletons that satisfy the active policy |
//! | [`check`] | Full run orchestration producing a [`check::Report`] |
//! | [`config`] | `.docmanrc` discovery, loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Full Rebuild Over Patching
//!
//! The index is recomposed from the tree on every run instead of having
//! entries appended. Deleted documents disappear, moved documents regroup,
//! and two runs over the same tree always agree byte for byte.
//!
//! ## Leading Block Only
//!
//! Metadata is read from the bold field lines right under the title and
//! nowhere else. A later section that happens to use `**Status**:` in a list
//! does not count, so a document cannot satisfy the rules by accident.
//!
//! ## Advisory Date Checks
//!
//! A parent README dated before one of its children is reported but never
//! fails a run. Malformed dates are the metadata check's job; the date check
//! silently skips what it cannot parse.

pub mod check;
pub mod config;
pub mod filter;
pub mod index;
pub mod metadata;
pub mod output;
pub mod policy;
pub mod template;
pub mod tree;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
