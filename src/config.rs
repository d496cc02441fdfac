//! Docman configuration module.
//!
//! Handles locating, loading, and validating the `.docmanrc` file. The file
//! uses TOML syntax and maps onto a fixed [`DocmanConfig`] structure; every key
//! is optional and unknown keys are rejected to catch typos early. A config
//! file with a `.json` extension is read as JSON with the same keys.
//!
//! ## Config File Location
//!
//! The first match wins:
//!
//! 1. An explicit path (`--config PATH`). It must exist.
//! 2. The `DOCMAN_CONFIG` environment variable. A dangling path is logged and
//!    the search continues.
//! 3. `.docmanrc` in the start directory or any ancestor, stopping after the
//!    first directory that holds a `.git` marker.
//! 4. Built-in defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! root_directory = "."                    # Scanned when no path is given on the CLI
//! index_file = "DOCUMENTATION_INDEX.md"   # Written at the repository root
//! recreate_index = true                   # false = report index drift, never write
//! strict_validation = true                # false = check metadata in READMEs only
//!
//! required_metadata = ["Status", "Version", "Last Updated"]
//! valid_statuses = ["✅ Production Ready", "🚧 Draft", "🚫 Deprecated", "⚠️ Experimental", "🔄 In Progress"]
//! version_pattern = "semantic"            # x.y.z
//! date_format = "YYYY-MM-DD"
//!
//! ignore_patterns = [".git/", "node_modules/", "venv/", "__pycache__/", ".pytest_cache/", ".mypy_cache/", "*.tmp", "*.log"]
//! metadata_exempt = []                    # Extra file names with no metadata block
//!
//! verbose_output = false
//! emoji_indicators = true
//! exit_on_errors = true
//! ```

use crate::filter::PathFilter;
use crate::policy::{DEFAULT_EXEMPT_FILES, DateFormat, ValidationPolicy, VersionScheme};
use crate::tree::MARKDOWN_EXTENSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the configuration file searched for in the directory tree.
pub const CONFIG_FILE_NAME: &str = ".docmanrc";

/// Environment variable pointing at a configuration file.
pub const CONFIG_ENV_VAR: &str = "DOCMAN_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Docman configuration loaded from `.docmanrc`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocmanConfig {
    /// Directory scanned when no path is given on the command line.
    pub root_directory: String,
    /// File name of the generated index, placed at the repository root.
    pub index_file: String,
    /// Write the rebuilt index. When false the index is only compared.
    pub recreate_index: bool,
    /// Check metadata on every document rather than READMEs only.
    pub strict_validation: bool,
    /// Fields every checked document must declare.
    pub required_metadata: Vec<String>,
    /// Allowed `Status` values; the first seeds new README templates.
    pub valid_statuses: Vec<String>,
    pub version_pattern: VersionScheme,
    pub date_format: DateFormat,
    /// Paths excluded from every scan.
    pub ignore_patterns: BTreeSet<String>,
    /// File names exempt from metadata checks, on top of the fixed set.
    pub metadata_exempt: BTreeSet<String>,
    pub verbose_output: bool,
    pub emoji_indicators: bool,
    /// Exit non-zero when violations are found.
    pub exit_on_errors: bool,
}

impl Default for DocmanConfig {
    fn default() -> Self {
        Self {
            root_directory: ".".to_string(),
            index_file: crate::index::DEFAULT_INDEX_FILE.to_string(),
            recreate_index: true,
            strict_validation: true,
            required_metadata: ["Status", "Version", "Last Updated"]
                .map(String::from)
                .to_vec(),
            valid_statuses: [
                "✅ Production Ready",
                "🚧 Draft",
                "🚫 Deprecated",
                "⚠️ Experimental",
                "🔄 In Progress",
            ]
            .map(String::from)
            .to_vec(),
            version_pattern: VersionScheme::Semantic,
            date_format: DateFormat::Iso,
            ignore_patterns: [
                ".git/",
                "node_modules/",
                "venv/",
                "__pycache__/",
                ".pytest_cache/",
                ".mypy_cache/",
                "*.tmp",
                "*.log",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            metadata_exempt: BTreeSet::new(),
            verbose_output: false,
            emoji_indicators: true,
            exit_on_errors: true,
        }
    }
}

impl DocmanConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let index = Path::new(&self.index_file);
        if self.index_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "index_file must not be empty".into(),
            ));
        }
        if self.index_file.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "index_file must be a file name, not a path".into(),
            ));
        }
        if index.extension().is_none_or(|e| e != MARKDOWN_EXTENSION) {
            return Err(ConfigError::Validation(format!(
                "index_file must end in .{MARKDOWN_EXTENSION}"
            )));
        }
        if self.required_metadata.is_empty() {
            return Err(ConfigError::Validation(
                "required_metadata must not be empty".into(),
            ));
        }
        if self
            .required_metadata
            .iter()
            .any(|f| f.trim().is_empty() || f.contains('*'))
        {
            return Err(ConfigError::Validation(
                "required_metadata entries must be non-empty and contain no '*'".into(),
            ));
        }
        if self.valid_statuses.is_empty()
            && self
                .required_metadata
                .iter()
                .any(|f| f == crate::metadata::STATUS)
        {
            return Err(ConfigError::Validation(
                "valid_statuses must not be empty while Status is required".into(),
            ));
        }
        if self.ignore_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "ignore_patterns must not contain empty patterns".into(),
            ));
        }
        Ok(())
    }

    /// Compile the ignore patterns.
    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(&self.ignore_patterns)
    }

    /// Derive the metadata validation policy.
    pub fn policy(&self) -> ValidationPolicy {
        let mut exempt_files: BTreeSet<String> = DEFAULT_EXEMPT_FILES
            .iter()
            .map(|s| s.to_string())
            .collect();
        exempt_files.insert(self.index_file.clone());
        exempt_files.extend(self.metadata_exempt.iter().cloned());

        ValidationPolicy {
            required_fields: self.required_metadata.clone(),
            valid_statuses: self.valid_statuses.clone(),
            version_scheme: self.version_pattern,
            date_format: self.date_format,
            exempt_files,
            readmes_only: !self.strict_validation,
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Environment(PathBuf),
    Discovered(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Environment(p) | ConfigSource::Discovered(p) => {
                Some(p)
            }
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "{} (--config)", p.display()),
            ConfigSource::Environment(p) => write!(f, "{} (${CONFIG_ENV_VAR})", p.display()),
            ConfigSource::Discovered(p) => write!(f, "{}", p.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// A validated configuration together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DocmanConfig,
    pub source: ConfigSource,
}

impl LoadedConfig {
    /// Directory to scan when none is given on the command line.
    ///
    /// A relative `root_directory` is taken relative to the config file's
    /// directory, or to `cwd` when running on defaults.
    pub fn scan_root(&self, cwd: &Path) -> PathBuf {
        let base = self
            .source
            .path()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(cwd);
        base.join(&self.config.root_directory)
    }
}

// =============================================================================
// Config discovery and loading
// =============================================================================

/// Locate the configuration file to use.
///
/// `env_override` is the value of [`CONFIG_ENV_VAR`], passed in so the search
/// stays testable without touching the process environment.
pub fn find_config_file(start: &Path, env_override: Option<&Path>) -> ConfigSource {
    if let Some(env_path) = env_override {
        if env_path.is_file() {
            return ConfigSource::Environment(env_path.to_path_buf());
        }
        warn!(
            path = %env_path.display(),
            "{CONFIG_ENV_VAR} points to a missing file, searching the tree instead"
        );
    }

    for dir in start.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return ConfigSource::Discovered(candidate);
        }
        if dir.join(".git").exists() {
            break;
        }
    }

    ConfigSource::Defaults
}

/// Parse and validate a single configuration file.
pub fn load_config_file(path: &Path) -> Result<DocmanConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let config: DocmanConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}

/// Resolve and load the active configuration.
///
/// `explicit` is the `--config` argument, if any. The environment variable is
/// read here; use [`find_config_file`] directly to bypass it.
pub fn load_config(start: &Path, explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let source = match explicit {
        Some(path) if path.is_file() => ConfigSource::Explicit(path.to_path_buf()),
        Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
        None => {
            let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
            find_config_file(start, env_path.as_deref())
        }
    };

    let config = match source.path() {
        Some(path) => load_config_file(path)?,
        None => DocmanConfig::default(),
    };
    debug!(source = %source, "configuration loaded");

    Ok(LoadedConfig { config, source })
}

/// Returns a fully-commented stock `.docmanrc` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Docman Configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Docman looks for this file (named .docmanrc) in the scanned directory and
# its parents, up to the repository root. Set DOCMAN_CONFIG or pass --config
# to point at a file elsewhere.

# Directory scanned when no path is given on the command line.
root_directory = "."

# ---------------------------------------------------------------------------
# Index
# ---------------------------------------------------------------------------
# Generated at the repository root (the nearest parent holding .git).
index_file = "DOCUMENTATION_INDEX.md"

# Rebuild and write the index on every run. When false, docman only reports
# documents missing from the existing index.
recreate_index = true

# ---------------------------------------------------------------------------
# Validation
# ---------------------------------------------------------------------------
# true: every document needs a metadata block. false: README files only.
strict_validation = true

# Fields every document must declare as **Field**: value under its title.
required_metadata = [
    "Status",
    "Version",
    "Last Updated",
]

# Allowed Status values. The first one is used for generated READMEs.
valid_statuses = [
    "✅ Production Ready",
    "🚧 Draft",
    "🚫 Deprecated",
    "⚠️ Experimental",
    "🔄 In Progress",
]

# Version format. Supported: "semantic" (x.y.z).
version_pattern = "semantic"

# Last Updated format. Supported: "YYYY-MM-DD".
date_format = "YYYY-MM-DD"

# Extra file names without a metadata block. CHANGELOG.md, LICENSE.md and the
# index file are always exempt.
metadata_exempt = []

# ---------------------------------------------------------------------------
# Ignore patterns
# ---------------------------------------------------------------------------
#   name     any path segment equal to name
#   name/    a directory (or nested path like docs/drafts/) anywhere
#   *.ext    glob against the file or directory name
ignore_patterns = [
    "*.log",
    "*.tmp",
    ".git/",
    ".mypy_cache/",
    ".pytest_cache/",
    "__pycache__/",
    "node_modules/",
    "venv/",
]

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
verbose_output = false
emoji_indicators = true

# Exit with status 1 when missing READMEs, metadata violations or broken
# links are found. Date inconsistencies never fail a run.
exit_on_errors = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = DocmanConfig::default();
        assert_eq!(config.index_file, "DOCUMENTATION_INDEX.md");
        assert_eq!(
            config.required_metadata,
            vec!["Status", "Version", "Last Updated"]
        );
        assert_eq!(config.valid_statuses.len(), 5);
        assert!(config.ignore_patterns.contains("node_modules/"));
        assert!(config.recreate_index);
        assert!(config.strict_validation);
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(DocmanConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: DocmanConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, DocmanConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
index_file = "DOCS.md"
ignore_patterns = ["target/"]
"#;
        let config: DocmanConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.index_file, "DOCS.md");
        assert_eq!(config.ignore_patterns.len(), 1);
        // Defaults preserved
        assert!(config.recreate_index);
        assert_eq!(config.valid_statuses[0], "✅ Production Ready");
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<DocmanConfig, _> = toml::from_str("colored_output = true");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_version_pattern_rejected() {
        let result: Result<DocmanConfig, _> = toml::from_str("version_pattern = \"calver\"");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_index_file_must_be_markdown() {
        let config = DocmanConfig {
            index_file: "INDEX.txt".into(),
            ..DocmanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_index_file_must_be_a_name() {
        let config = DocmanConfig {
            index_file: "docs/INDEX.md".into(),
            ..DocmanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_required_metadata_not_empty() {
        let config = DocmanConfig {
            required_metadata: vec![],
            ..DocmanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_statuses_needed_when_status_required() {
        let config = DocmanConfig {
            valid_statuses: vec![],
            ..DocmanConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DocmanConfig {
            valid_statuses: vec![],
            required_metadata: vec!["Owner".into()],
            ..DocmanConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    #[test]
    fn policy_follows_strict_flag() {
        let mut config = DocmanConfig::default();
        assert!(!config.policy().readmes_only);
        config.strict_validation = false;
        assert!(config.policy().readmes_only);
    }

    #[test]
    fn policy_exempts_configured_index_and_extras() {
        let config = DocmanConfig {
            index_file: "DOCS.md".into(),
            metadata_exempt: ["NOTICE.md".to_string()].into(),
            ..DocmanConfig::default()
        };
        let policy = config.policy();
        assert!(policy.is_exempt("DOCS.md"));
        assert!(policy.is_exempt("NOTICE.md"));
        assert!(policy.is_exempt("CHANGELOG.md"));
        assert!(!policy.is_exempt("DOCUMENTATION_INDEX.md"));
    }

    // =========================================================================
    // Discovery and loading
    // =========================================================================

    #[test]
    fn find_config_in_parent_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "verbose_output = true\n").unwrap();
        let nested = tmp.path().join("apps/web");
        fs::create_dir_all(&nested).unwrap();

        let source = find_config_file(&nested, None);
        assert_eq!(
            source,
            ConfigSource::Discovered(tmp.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn search_stops_at_repository_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert_eq!(find_config_file(&repo, None), ConfigSource::Defaults);
    }

    #[test]
    fn env_override_wins_over_tree() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();
        let elsewhere = tmp.path().join("custom.toml");
        fs::write(&elsewhere, "").unwrap();

        let source = find_config_file(tmp.path(), Some(&elsewhere));
        assert_eq!(source, ConfigSource::Environment(elsewhere));
    }

    #[test]
    fn dangling_env_override_falls_back_to_tree() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();

        let source = find_config_file(tmp.path(), Some(&tmp.path().join("missing.toml")));
        assert_eq!(
            source,
            ConfigSource::Discovered(tmp.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn load_explicit_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docman.toml");
        fs::write(&path, "strict_validation = false\nindex_file = \"INDEX.md\"\n").unwrap();

        let loaded = load_config(tmp.path(), Some(&path)).unwrap();
        assert_eq!(loaded.source, ConfigSource::Explicit(path));
        assert!(!loaded.config.strict_validation);
        assert_eq!(loaded.config.index_file, "INDEX.md");
    }

    #[test]
    fn load_missing_explicit_config_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(tmp.path(), Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_json_config_by_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docman.json");
        fs::write(
            &path,
            r#"{"strict_validation": false, "ignore_patterns": ["target/"]}"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert!(!config.strict_validation);
        assert_eq!(config.ignore_patterns.len(), 1);
        assert_eq!(config.index_file, DocmanConfig::default().index_file);
    }

    #[test]
    fn load_json_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docman.JSON");
        fs::write(&path, r#"{"colored_output": true}"#).unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn load_runs_validation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "index_file = \"index.txt\"\n").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn scan_root_is_relative_to_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "root_directory = \"docs\"\n").unwrap();

        let loaded = load_config(tmp.path(), Some(&path)).unwrap();
        assert_eq!(loaded.scan_root(Path::new("/elsewhere")), tmp.path().join("docs"));

        let defaults = LoadedConfig {
            config: DocmanConfig::default(),
            source: ConfigSource::Defaults,
        };
        assert_eq!(defaults.scan_root(Path::new("/work")), Path::new("/work/."));
    }
}
