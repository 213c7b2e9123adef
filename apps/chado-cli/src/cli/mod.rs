//! Command-line interface for chado-cli.
//!
//! - **init**: create the Chado tables and seed the fixed vocabulary
//! - **resolve**: parse a genotype, report problems and optionally register it
//! - **report**: show a registered genotype and its components
//!
//! ## Usage
//!
//! ```text
//! chado-cli --db chado.db init
//!
//! # Dry run: everything is rolled back
//! chado-cli --db chado.db resolve "Df(2L)x/wg[+] P{UAS-wg.A}" --pub FBrf0000001
//!
//! # Register the genotype and mint its curie
//! chado-cli --db chado.db resolve "wg[1]/wg[1]" --commit
//!
//! chado-cli --db chado.db report FBgo0000001 --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use chado_genotype::GenotypeConfig;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

pub mod init;
pub mod report;
pub mod resolve;

#[derive(Parser)]
#[command(name = "chado-cli")]
#[command(version)]
#[command(about = "Resolve and register FlyBase genotypes against a Chado database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// SQLite database holding the Chado tables
    #[arg(long, global = true, default_value = "chado.db")]
    pub db: PathBuf,

    /// JSON file overriding the default genotype configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<GenotypeConfig> {
        match &self.config {
            Some(path) => GenotypeConfig::from_path(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display())),
            None => Ok(GenotypeConfig::default()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the schema and seed the fixed vocabulary
    Init,

    /// Resolve a genotype and optionally register it
    Resolve(resolve::ResolveArgs),

    /// Show a registered genotype
    Report(report::ReportArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn open_db(path: &Path) -> anyhow::Result<Connection> {
    Connection::open(path).with_context(|| format!("Failed to open database {}", path.display()))
}

pub(crate) fn print_lines(label: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!("{}:", label);
    for line in lines {
        println!("  {}", line);
    }
}
