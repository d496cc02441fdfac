//! README skeletons for directories that lack one.
//!
//! The metadata block is built from the same [`ValidationPolicy`] the
//! validator uses: `Status` takes the first allowed status, `Version` starts
//! at `0.1.0`, `Last Updated` is the given day, and any custom required
//! field is written with an empty value for the author to fill in.

use crate::index::PLACEHOLDER_STATUS;
use crate::metadata::{LAST_UPDATED, STATUS, VERSION};
use crate::policy::ValidationPolicy;
use crate::tree::README_FILE;
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const INITIAL_VERSION: &str = "0.1.0";

const BODY: &str = "\
## Description

Brief description of this component.

## Usage

How to use this component.

## Configuration

Any configuration options or requirements.

## Notes

Additional notes or considerations.
";

/// Render a README body that passes metadata validation under `policy`.
pub fn readme_template(title: &str, policy: &ValidationPolicy, today: NaiveDate) -> String {
    let fields: Vec<String> = policy
        .required_fields
        .iter()
        .map(|field| {
            let value = match field.as_str() {
                STATUS => policy
                    .valid_statuses
                    .first()
                    .map_or(PLACEHOLDER_STATUS.to_string(), Clone::clone),
                VERSION => INITIAL_VERSION.to_string(),
                LAST_UPDATED => today.format(policy.date_format.chrono_format()).to_string(),
                _ => String::new(),
            };
            format!("**{field}**: {value}").trim_end().to_string()
        })
        .collect();

    format!("# {title}\n\n{}\n\n{BODY}", fields.join("\n"))
}

/// Title for a generated README: the directory's own name.
pub fn title_for(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Documentation".to_string())
}

/// Create `dir/README.md` holding `body`.
///
/// Fails with `AlreadyExists` rather than overwrite an existing README.
pub fn write_readme(dir: &Path, body: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(README_FILE);
    let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
    file.write_all(body.as_bytes())?;
    Ok(path)
}
