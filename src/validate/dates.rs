//! Parent/child `Last Updated` consistency.
//!
//! A README whose immediate parent directory also has a README must not be
//! newer than that parent. Only direct parent/child pairs are compared, not
//! whole ancestor chains. Findings are advisory and never fail a run.
//!
//! A pair is skipped silently when either date is missing or unparseable;
//! malformed dates are the metadata validator's concern.

use crate::metadata::{LAST_UPDATED, read_metadata_lossy};
use crate::policy::DateFormat;
use crate::tree::{DocumentTree, display_path};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A parent README dated before one of its direct children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateIssue {
    pub parent: PathBuf,
    pub parent_date: NaiveDate,
    pub child: PathBuf,
    pub child_date: NaiveDate,
}

impl fmt::Display for DateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parent {} ({}) is older than child {} ({})",
            display_path(&self.parent),
            self.parent_date,
            display_path(&self.child),
            self.child_date
        )
    }
}

/// Compare every README against the README of its parent directory.
pub fn check_date_consistency(tree: &DocumentTree, format: DateFormat) -> Vec<DateIssue> {
    let readme_by_dir: HashMap<&Path, &Path> = tree
        .readmes()
        .filter_map(|readme| readme.parent().map(|dir| (dir, readme)))
        .collect();

    let dates: HashMap<&Path, NaiveDate> = tree
        .readmes()
        .filter_map(|readme| last_updated(readme, format).map(|date| (readme, date)))
        .collect();

    let mut issues = Vec::new();
    for child in tree.readmes() {
        let Some(dir) = child.parent() else { continue };
        if dir == tree.root() {
            continue;
        }
        let Some(parent_dir) = dir.parent() else {
            continue;
        };
        if tree.filter().is_excluded(parent_dir) {
            continue;
        }
        let Some(&parent) = readme_by_dir.get(parent_dir) else {
            continue;
        };

        let (Some(&child_date), Some(&parent_date)) = (dates.get(child), dates.get(parent)) else {
            continue;
        };
        if child_date > parent_date {
            issues.push(DateIssue {
                parent: tree.relative(parent),
                parent_date,
                child: tree.relative(child),
                child_date,
            });
        }
    }

    issues
}

fn last_updated(readme: &Path, format: DateFormat) -> Option<NaiveDate> {
    let metadata = read_metadata_lossy(readme);
    let raw = metadata.get(LAST_UPDATED)?;
    NaiveDate::parse_from_str(raw, format.chrono_format()).ok()
}
