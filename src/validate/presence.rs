//! README presence: every directory needs a `README.md` directly inside it.

use super::Violation;
use crate::tree::{DocumentTree, README_FILE};
use std::path::Path;

/// Flag the root (unless excluded) and every scanned directory lacking a README.
///
/// The root is reported first as `.`, then subdirectories in discovery order.
pub fn validate_presence(tree: &DocumentTree) -> Vec<Violation> {
    let root = (!tree.root_excluded()).then_some(tree.root());

    root.into_iter()
        .chain(tree.directories().iter().map(|d| d.as_path()))
        .filter(|dir| !has_readme(dir))
        .map(|dir| Violation::MissingReadme {
            dir: tree.relative(dir),
        })
        .collect()
}

fn has_readme(dir: &Path) -> bool {
    dir.join(README_FILE).is_file()
}
