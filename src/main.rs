use anyhow::{Context, Result};
use batch_edit::config::{group_by_path, load_from_path};
use batch_edit::{BatchEditor, BatchOptions, FileEditOutcome, FileStatus, FsStore, WorkspaceGuard};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "batch-edit")]
#[command(about = "Apply line- and pattern-addressed edits to files", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an edit plan to a workspace
    Apply {
        /// Edit plan file (.json or .toml)
        #[arg(short, long)]
        plan: PathBuf,

        /// Path to workspace root (defaults to the current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Print outcomes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the diff an edit plan would produce without writing anything
    Preview {
        /// Edit plan file (.json or .toml)
        #[arg(short, long)]
        plan: PathBuf,

        /// Path to workspace root (defaults to the current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Print outcomes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that an edit plan parses and is well-formed
    Validate {
        /// Edit plan file (.json or .toml)
        #[arg(short, long)]
        plan: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Apply {
            plan,
            workspace,
            dry_run,
            diff,
            json,
        } => cmd_apply(&plan, workspace, dry_run, diff, json),

        Commands::Preview {
            plan,
            workspace,
            json,
        } => cmd_apply(&plan, workspace, true, true, json),

        Commands::Validate { plan } => cmd_validate(&plan),
    }
}

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve workspace path
///
/// Priority order:
/// 1. Explicit --workspace flag
/// 2. BATCH_EDIT_WORKSPACE environment variable
/// 3. Current directory
fn resolve_workspace(cli_workspace: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = cli_workspace {
        return path
            .canonicalize()
            .with_context(|| format!("workspace not found: {}", path.display()));
    }

    if let Ok(env_path) = env::var("BATCH_EDIT_WORKSPACE") {
        let path = PathBuf::from(&env_path);
        if path.is_dir() {
            return Ok(path.canonicalize()?);
        }
        tracing::warn!(
            path = %env_path,
            "BATCH_EDIT_WORKSPACE is set but is not a directory; using current directory"
        );
    }

    Ok(env::current_dir()?)
}

/// Print a unified diff with added/removed lines coloured.
fn display_diff(diff: &str) {
    for line in diff.lines() {
        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.dimmed()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with("@@") {
            line.cyan()
        } else {
            line.normal()
        };
        println!("  {}", styled);
    }
}

fn cmd_apply(
    plan_path: &Path,
    workspace: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
    json: bool,
) -> Result<()> {
    let workspace = resolve_workspace(workspace)?;
    let plan = load_from_path(plan_path)?;

    let options = BatchOptions {
        dry_run: dry_run || plan.dry_run,
        output_diff: show_diff || plan.output_diff,
    };

    let guard = WorkspaceGuard::new(&workspace)?;
    let store = FsStore;
    let editor = BatchEditor::new(&guard, &store);
    let outcomes = editor.apply(&plan.edits, options);

    let failed = outcomes
        .iter()
        .filter(|o| o.status == FileStatus::Failed)
        .count();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        report(&workspace, &outcomes, options.dry_run);
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn report(workspace: &Path, outcomes: &[FileEditOutcome], dry_run: bool) {
    println!("Workspace: {}", workspace.display());
    if dry_run {
        println!("{}", "[DRY RUN - no files will be written]".cyan());
    }
    println!();

    let mut total_success = 0;
    let mut total_skipped = 0;
    let mut total_failed = 0;

    for outcome in outcomes {
        let message = outcome.message.as_deref().unwrap_or("");
        match outcome.status {
            FileStatus::Success => {
                println!("{} {}: {}", "✓".green(), outcome.path, message);
                total_success += 1;
            }
            FileStatus::Skipped => {
                println!("{} {}: {}", "⊙".yellow(), outcome.path, message);
                total_skipped += 1;
            }
            FileStatus::Failed => {
                eprintln!("{} {}: Failed - {}", "✗".red(), outcome.path, message);
                total_failed += 1;
            }
        }

        if let Some(diff) = &outcome.diff {
            display_diff(diff);
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} succeeded", format!("{}", total_success).green());
    println!("  {} skipped", format!("{}", total_skipped).yellow());
    println!("  {} failed", format!("{}", total_failed).red());
}

fn cmd_validate(plan_path: &Path) -> Result<()> {
    let plan = load_from_path(plan_path)?;

    println!(
        "{} {}: {} edit(s)",
        "✓".green(),
        plan_path.display(),
        plan.edits.len()
    );
    for (path, requests) in group_by_path(&plan.edits) {
        println!("  {} ({} request(s))", path, requests.len());
    }

    Ok(())
}
