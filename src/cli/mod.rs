//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ragpipe")]
#[command(about = "Local retrieval-augmented document search", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a file or directory into the retriever
    Ingest {
        /// File or directory to ingest
        path: PathBuf,

        /// Glob pattern for directory ingestion (file name only)
        #[arg(short, long, default_value = "*")]
        pattern: String,
    },

    /// Retrieve the chunks most relevant to a question
    Query {
        /// The question to search for
        text: String,

        /// Number of chunks to retrieve
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent query log records
    Logs {
        /// Number of records to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the standard location)
        file: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
