//! StatFin crawler main entry point
//!
//! This is the command-line interface for walking a PXWeb database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use statfin_crawler::config::{load_config_with_hash, Config};
use statfin_crawler::node::Node;
use statfin_crawler::{Dataset, SelectorSet, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// StatFin crawler: walks a PXWeb statistical database and fetches tables
#[derive(Parser, Debug)]
#[command(name = "statfin-crawler")]
#[command(version)]
#[command(about = "Walks a PXWeb statistical database and fetches tables", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to Statistics Finland)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the children of a folder, or the variables of a table
    List {
        /// Path below the database root
        #[arg(default_value = "")]
        path: String,
    },

    /// Walk randomly down to a table and fetch it
    Random {
        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Fetch the table at a known path
    Walk {
        /// Table path below the database root, or its full URL
        path: String,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

#[derive(clap::Args, Debug)]
struct FetchArgs {
    /// Select values for a variable: NAME=VALUE[,VALUE...] (repeatable)
    #[arg(short, long = "select", value_name = "NAME=VALUES", value_parser = parse_selector)]
    selectors: Vec<(String, Vec<String>)>,

    /// Write the table to this CSV file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

impl FetchArgs {
    fn selector_set(&self) -> SelectorSet {
        self.selectors.iter().cloned().collect()
    }
}

/// Parses `NAME=V1,V2` into a selector entry
fn parse_selector(s: &str) -> Result<(String, Vec<String>), String> {
    let (name, values) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUES, got '{}'", s))?;

    if name.trim().is_empty() {
        return Err(format!("missing variable name in '{}'", s));
    }

    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    Ok((name.trim().to_string(), values))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let mut session = Session::new(config).context("Failed to start session")?;

    match cli.command {
        Command::List { path } => handle_list(&mut session, &path).await?,
        Command::Random { fetch } => {
            match session.walk_random(&fetch.selector_set()).await? {
                Some(table) => write_dataset(&table.into_dataset(), fetch.out.as_ref())?,
                None => tracing::error!("Random walk gave up before reaching a table"),
            }
        }
        Command::Walk { path, fetch } => {
            let table = session
                .walk_to(&path, &fetch.selector_set())
                .await
                .with_context(|| format!("Failed to fetch {}", path))?;
            write_dataset(&table.into_dataset(), fetch.out.as_ref())?;
        }
    }

    tracing::debug!("\n{}", session);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("statfin_crawler=info,warn"),
            1 => EnvFilter::new("statfin_crawler=debug,info"),
            2 => EnvFilter::new("statfin_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `list`: prints a folder's children or a table's variables
async fn handle_list(session: &mut Session, path: &str) -> Result<()> {
    let node = session.navigator_mut().set_path(path).await?;

    match node {
        Node::Folder(listing) => {
            for (index, child) in listing.children.iter().enumerate() {
                println!(
                    "{:>4}  {:<40} {}",
                    index,
                    child.id.as_deref().unwrap_or("-"),
                    child.text.as_deref().unwrap_or("")
                );
            }
        }
        Node::Table(table) => {
            println!("{}", table.title);
            for variable in &table.variables {
                println!(
                    "  {} ({}): {} values",
                    variable.code,
                    variable.text,
                    variable.values.len()
                );
                for (value, text) in variable.values.iter().zip(&variable.value_texts) {
                    println!("      {:<20} {}", value, text);
                }
            }
        }
    }

    Ok(())
}

/// Writes a dataset to a CSV file or stdout
fn write_dataset(dataset: &Dataset, out: Option<&PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            dataset
                .save_csv(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ {} rows written to: {}", dataset.len(), path.display());
        }
        None => dataset.write_csv(std::io::stdout().lock())?,
    }
    Ok(())
}
