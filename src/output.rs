//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! ============================================================
//! 📊 DOCUMENTATION VALIDATION SUMMARY
//! ============================================================
//!
//! 🚧 Missing READMEs (1)
//!   • Missing README: libs
//!
//! 🚧 Metadata violations (0)
//!   ✅ No issues found
//!
//! 🚧 Broken links (0)
//!   ✅ No issues found
//!
//! 🚧 Date inconsistencies (1)
//!   • Parent README.md (2025-06-01) is older than child apps/README.md (2025-06-10)
//!
//! ✅ New index entries (1)
//!   • apps/README.md
//! ------------------------------------------------------------
//! 🚧 Found 1 documentation issue
//! ```
//!
//! With emoji indicators turned off the markers are dropped and bullets
//! become `-`.
//!
//! ## Index
//!
//! ```text
//! Wrote /repo/DOCUMENTATION_INDEX.md (12 entries, 2 new)
//!     apps/README.md
//!     guides/setup.md
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::check::Report;
use crate::index::IndexUpdate;
use crate::policy::ValidationPolicy;
use crate::tree::display_path;
use std::fmt::Display;
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 60;

/// Marker set for one output style.
struct Markers {
    title: &'static str,
    problem: &'static str,
    notice: &'static str,
    ok: &'static str,
    warning: &'static str,
    bullet: &'static str,
}

const EMOJI: Markers = Markers {
    title: "📊 ",
    problem: "🚧 ",
    notice: "✅ ",
    ok: "✅ ",
    warning: "⚠️ ",
    bullet: "•",
};

const PLAIN: Markers = Markers {
    title: "",
    problem: "",
    notice: "",
    ok: "",
    warning: "Warning: ",
    bullet: "-",
};

fn markers(emoji: bool) -> &'static Markers {
    if emoji { &EMOJI } else { &PLAIN }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Check
// ============================================================================

fn section<T: Display>(
    lines: &mut Vec<String>,
    m: &Markers,
    marker: &str,
    title: &str,
    items: &[T],
) {
    lines.push(String::new());
    lines.push(format!("{marker}{title} ({})", items.len()));
    if items.is_empty() {
        lines.push(format!("  {}No issues found", m.ok));
    }
    for item in items {
        lines.push(format!("  {} {item}", m.bullet));
    }
}

/// Format the summary of a full check run.
pub fn format_report(report: &Report, emoji: bool) -> Vec<String> {
    let m = markers(emoji);
    let heavy = "=".repeat(RULE_WIDTH);

    let mut lines = vec![
        heavy.clone(),
        format!("{}DOCUMENTATION VALIDATION SUMMARY", m.title),
        heavy,
    ];

    section(&mut lines, m, m.problem, "Missing READMEs", &report.missing_readmes);
    section(&mut lines, m, m.problem, "Metadata violations", &report.metadata_violations);
    section(&mut lines, m, m.problem, "Broken links", &report.broken_links);
    section(&mut lines, m, m.problem, "Date inconsistencies", &report.date_issues);
    let notices = if report.index.recreated {
        "New index entries"
    } else {
        "Missing from index"
    };
    section(&mut lines, m, m.notice, notices, &report.new_index_entries);

    if let Some(warning) = &report.index.warning {
        lines.push(String::new());
        lines.push(format!("{}{warning}", m.warning));
    }

    lines.push("-".repeat(RULE_WIDTH));
    let failures = report.failure_count();
    if failures == 0 {
        lines.push(format!("{}All documentation checks passed!", m.ok));
    } else {
        lines.push(format!(
            "{}Found {}",
            m.problem,
            plural(failures, "documentation issue")
        ));
    }

    lines
}

/// Print the check summary to stdout.
pub fn print_report(report: &Report, emoji: bool) {
    for line in format_report(report, emoji) {
        println!("{}", line);
    }
}

// ============================================================================
// Index
// ============================================================================

/// Format the result of an index rebuild.
pub fn format_index_update(update: &IndexUpdate) -> Vec<String> {
    let path = update.index_path.display();
    let entries = match update.document.len() {
        1 => "1 entry".to_string(),
        n => format!("{n} entries"),
    };
    let mut lines = if !update.is_unchanged() {
        vec![format!(
            "Wrote {path} ({entries}, {} new)",
            update.added.len()
        )]
    } else {
        vec![format!("{path} is up to date ({entries})")]
    };
    lines.extend(update.added.iter().map(|p| format!("    {p}")));
    lines
}

pub fn print_index_update(update: &IndexUpdate) {
    for line in format_index_update(update) {
        println!("{}", line);
    }
}

// ============================================================================
// Fix
// ============================================================================

/// Format the list of READMEs the fix command is about to create.
pub fn format_fix_plan(dirs: &[PathBuf], policy: &ValidationPolicy, emoji: bool) -> Vec<String> {
    let m = markers(emoji);
    if dirs.is_empty() {
        return vec![format!("{}No missing README files to fix", m.ok)];
    }

    let mut lines = vec![format!(
        "Found {} missing README files:",
        dirs.len()
    )];
    lines.extend(
        dirs.iter()
            .enumerate()
            .map(|(i, dir)| format!("  {}. {}", i + 1, display_path(dir))),
    );
    lines.push(String::new());
    lines.push(format!(
        "Templates use required fields: {}",
        policy.required_fields.join(", ")
    ));
    if let Some(status) = policy.valid_statuses.first() {
        lines.push(format!("Default status: {status}"));
    }
    lines
}

pub fn print_fix_plan(dirs: &[PathBuf], policy: &ValidationPolicy, emoji: bool) {
    for line in format_fix_plan(dirs, policy, emoji) {
        println!("{}", line);
    }
}

/// One line per README creation attempt.
pub fn format_fix_result(dir: &Path, result: &std::io::Result<PathBuf>, emoji: bool) -> String {
    let m = markers(emoji);
    match result {
        Ok(_) => format!("{}Created README.md in {}", m.ok, display_path(dir)),
        Err(e) => format!(
            "{}Could not create README.md in {}: {e}",
            m.warning,
            display_path(dir)
        ),
    }
}
