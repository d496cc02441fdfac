use clap::{Parser, Subcommand};
use docman::config::{self, DocmanConfig};
use docman::tree::DocumentTree;
use docman::validate::{Violation, validate_presence};
use docman::{check, index, output, template};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV_VAR: &str = "DOCMAN_LOG";

#[derive(Parser)]
#[command(name = "docman")]
#[command(about = "Validate documentation conventions and maintain a documentation index")]
#[command(long_about = "\
Validate documentation conventions and maintain a documentation index

Every directory needs a README.md whose title is followed by a metadata block:

  # Payments Service

  **Status**: ✅ Production Ready
  **Version**: 2.1.0
  **Last Updated**: 2025-06-12

Checks:
  Presence   every directory has a README.md
  Metadata   required fields present, status/version/date well-formed
  Links      relative [text](target) links resolve to existing files
  Dates      a parent README is not older than its direct children (advisory)

The documentation index (DOCUMENTATION_INDEX.md by default) is rebuilt at the
repository root on every check.

Run 'docman gen-config' to generate a documented .docmanrc.")]
#[command(version)]
struct Cli {
    /// Directory to check (default: root_directory from the config)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config file to use instead of searching for .docmanrc
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every check and rebuild the documentation index
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild the documentation index only
    Index,
    /// Create template READMEs in directories missing one
    Fix {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print a stock .docmanrc with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let cwd = std::env::current_dir()?;
    let search_start = cli.root.clone().unwrap_or_else(|| cwd.clone());
    let loaded = config::load_config(&search_start, cli.config.as_deref())?;
    init_tracing(cli.verbose || loaded.config.verbose_output);
    tracing::debug!(source = %loaded.source, "using configuration");

    let root = cli.root.unwrap_or_else(|| loaded.scan_root(&cwd));
    let config = loaded.config;

    match cli.command {
        Command::Check { json } => {
            let report = check::run(&root, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_report(&report, config.emoji_indicators);
            }
            if !report.is_clean() && config.exit_on_errors {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Index => {
            let update = index::rebuild(&root, &config.path_filter(), &config.index_file)?;
            output::print_index_update(&update);
        }
        Command::Fix { yes } => fix(&root, &config, yes)?,
        // Printed before config loading.
        Command::GenConfig => {}
    }

    Ok(ExitCode::SUCCESS)
}

/// Install the stderr log subscriber. `DOCMAN_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Create template READMEs for every directory the presence check flags.
fn fix(root: &Path, config: &DocmanConfig, assume_yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let policy = config.policy();
    let tree = DocumentTree::scan(root, &config.path_filter())?;
    let missing: Vec<PathBuf> = validate_presence(&tree)
        .into_iter()
        .filter_map(|v| match v {
            Violation::MissingReadme { dir } => Some(dir),
            _ => None,
        })
        .collect();

    output::print_fix_plan(&missing, &policy, config.emoji_indicators);
    if missing.is_empty() {
        return Ok(());
    }
    if !assume_yes && !confirm(&format!("Create {} README files? [y/N]: ", missing.len()))? {
        println!("Cancelled");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    for rel in &missing {
        let dir = root.join(rel);
        let named = dir.canonicalize().unwrap_or_else(|_| dir.clone());
        let body = template::readme_template(&template::title_for(&named), &policy, today);
        let result = template::write_readme(&dir, &body);
        println!("{}", output::format_fix_result(rel, &result, config.emoji_indicators));
    }
    Ok(())
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
