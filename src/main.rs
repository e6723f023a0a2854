//! truthtree - command-line interface
//!
//! Reads a JSON problem, develops its truth tree automatically and reports
//! whether every branch closed.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use truthtree::config::{LogLevel, OutputFormat, TruthTreeConfig};
use truthtree::{Problem, TableauProver, TableauResult, Term, TreeSnapshot};

#[derive(Parser)]
#[command(name = "truthtree")]
#[command(version = env!("TRUTHTREE_VERSION"))]
#[command(long_version = concat!(env!("TRUTHTREE_VERSION"), " (", env!("TRUTHTREE_TARGET"), ")"))]
#[command(about = "Semantic tableau prover for first-order logic", long_about = None)]
struct Cli {
    /// Problem file (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Read the problem from stdin
    #[arg(long)]
    stdin: bool,

    /// Configuration file (defaults to the standard search path)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of develop steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Maximum number of tree nodes
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Result and tree as JSON
    Json,
    /// One-line summary
    Summary,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Summary => OutputFormat::Summary,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    result: &'a TableauResult,
    nodes: usize,
    open_branches: usize,
    terms: Vec<&'a Term>,
    tree: TreeSnapshot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = TruthTreeConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            config.apply_env_overrides();
            config
        }
        None => TruthTreeConfig::load().context("Failed to load configuration")?,
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    init_logging(config.general.log_level);

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut content = String::new();
    match &cli.input {
        Some(path) if !cli.stdin => {
            content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
        }
        _ => {
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read from stdin")?;
        }
    }

    let problem = Problem::from_json(&content).context("Invalid problem")?;
    let mut tree = problem
        .into_tableau(config.tree_options())
        .context("Failed to build tree")?;
    info!(
        premises = problem.premises.len(),
        conclusion = problem.conclusion.is_some(),
        "problem loaded"
    );

    let prover = TableauProver::new(config.prover_config());
    let result = prover.prove(&mut tree)?;

    let rendered = match config.general.format {
        OutputFormat::Json => {
            let report = Report {
                result: &result,
                nodes: tree.node_count(),
                open_branches: tree.open_branches(),
                terms: tree.terms().iter().collect(),
                tree: tree.snapshot(),
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            json
        }
        OutputFormat::Summary => format!("{}\n", summary(&result, tree.node_count())),
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut TruthTreeConfig, cli: &Cli) {
    if let Some(steps) = cli.max_steps {
        config.prover.max_steps = steps;
    }
    if let Some(nodes) = cli.max_nodes {
        config.prover.max_nodes = nodes;
    }
    if let Some(format) = cli.format {
        config.general.format = format.into();
    }
    if cli.quiet {
        config.general.log_level = LogLevel::Quiet;
    } else if cli.verbose {
        config.general.log_level = LogLevel::Verbose;
    }
}

/// Install the stderr subscriber; `RUST_LOG` takes precedence over the config
fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn summary(result: &TableauResult, nodes: usize) -> String {
    match result {
        TableauResult::Closed { steps, .. } => {
            format!("closed: every branch closed after {} steps ({} nodes)", steps, nodes)
        }
        TableauResult::Open {
            steps,
            open_branches,
        } => format!(
            "open: {} open branch(es) after {} steps ({} nodes)",
            open_branches, steps, nodes
        ),
        TableauResult::Unknown { steps, reason } => {
            format!("unknown: {} after {} steps ({} nodes)", reason, steps, nodes)
        }
    }
}
