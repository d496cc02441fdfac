//! Full validation run: scan once, run every check, rebuild the index.
//!
//! ```text
//! start ──scan──► DocumentTree ─┬─► presence   ─► missing_readmes
//!                               ├─► metadata   ─► metadata_violations
//!                               ├─► links      ─► broken_links
//!                               └─► dates      ─► date_issues
//! repo root ──scan──► index ───────────────────► new_index_entries
//! ```
//!
//! The index is composed from the repository root, which is usually the
//! start directory itself; the tree is then reused instead of walked twice.
//! Only the first three lists count as failures.

use crate::config::DocmanConfig;
use crate::index::{IndexUpdate, plan_index};
use crate::tree::{DocumentTree, TreeError, resolve_repo_root};
use crate::validate::{
    DateIssue, Violation, check_date_consistency, validate_links, validate_metadata,
    validate_presence,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Tree(#[from] TreeError),
}

/// What happened to the index file during a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStatus {
    pub path: PathBuf,
    /// Whether the run was allowed to write the index.
    pub recreated: bool,
    /// Whether the file on disk changed.
    pub written: bool,
    /// Write failure, reported but never fatal.
    pub warning: Option<String>,
}

/// The five ordered result lists of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub missing_readmes: Vec<Violation>,
    pub metadata_violations: Vec<Violation>,
    pub broken_links: Vec<Violation>,
    pub date_issues: Vec<DateIssue>,
    pub new_index_entries: Vec<String>,
    pub index: IndexStatus,
}

impl Report {
    /// Violations that fail the run. Date issues and index notices are advisory.
    pub fn failure_count(&self) -> usize {
        self.missing_readmes.len() + self.metadata_violations.len() + self.broken_links.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Validate the tree under `start` and bring the index up to date.
pub fn run(start: &Path, config: &DocmanConfig) -> Result<Report, CheckError> {
    let filter = config.path_filter();
    let policy = config.policy();

    let tree = DocumentTree::scan(start, &filter)?;
    let repo_root = resolve_repo_root(start)?;
    let index_tree = if tree.root() == repo_root {
        None
    } else {
        Some(DocumentTree::scan(&repo_root, &filter)?)
    };
    let update = plan_index(index_tree.as_ref().unwrap_or(&tree), &config.index_file);

    let skip = config.recreate_index.then_some(update.index_path.as_path());
    let mut report = Report {
        missing_readmes: validate_presence(&tree),
        metadata_violations: validate_metadata(&tree, &policy),
        broken_links: validate_links(&tree, skip),
        date_issues: check_date_consistency(&tree, policy.date_format),
        ..Report::default()
    };

    report.index = if config.recreate_index {
        write_index(&update)
    } else {
        IndexStatus {
            path: update.index_path.clone(),
            ..IndexStatus::default()
        }
    };
    report.new_index_entries = update.added;

    info!(
        failures = report.failure_count(),
        date_issues = report.date_issues.len(),
        new_index_entries = report.new_index_entries.len(),
        "check complete"
    );
    Ok(report)
}

fn write_index(update: &IndexUpdate) -> IndexStatus {
    let mut status = IndexStatus {
        path: update.index_path.clone(),
        recreated: true,
        ..IndexStatus::default()
    };
    match update.write() {
        Ok(written) => status.written = written,
        Err(e) => {
            warn!(path = %update.index_path.display(), error = %e, "could not write index");
            status.warning = Some(format!(
                "Could not write {}: {e}",
                update.index_path.display()
            ));
        }
    }
    status
}
