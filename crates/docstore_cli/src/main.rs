//! DocStore CLI
//!
//! Command-line tools for DocStore snapshot files.
//!
//! # Commands
//!
//! - `inspect` - Display collections and document counts of a snapshot
//! - `verify` - Restore a snapshot with full validation
//! - `get` - Print one document as JSON
//! - `demo` - Walk through a small user service backed by a snapshot

mod commands;
mod users;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// DocStore command-line snapshot tools.
#[derive(Parser)]
#[command(name = "docstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display collections, primary keys and document counts
    Inspect {
        /// Path to the snapshot file
        snapshot: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Restore a snapshot and report whether every document is valid
    Verify {
        /// Path to the snapshot file
        snapshot: PathBuf,
    },

    /// Print a document as JSON
    Get {
        /// Path to the snapshot file
        snapshot: PathBuf,

        /// Collection name
        #[arg(short, long)]
        collection: String,

        /// Primary key value
        #[arg(short, long)]
        key: String,
    },

    /// Run the user service walkthrough against a snapshot file
    Demo {
        /// Path the snapshot is written to
        snapshot: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { snapshot, format } => {
            commands::inspect::run(&snapshot, &format)?;
        }
        Commands::Verify { snapshot } => {
            commands::verify::run(&snapshot)?;
        }
        Commands::Get {
            snapshot,
            collection,
            key,
        } => {
            commands::get::run(&snapshot, &collection, &key)?;
        }
        Commands::Demo { snapshot } => {
            commands::demo::run(&snapshot)?;
        }
        Commands::Version => {
            println!("DocStore CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("DocStore Core v{}", docstore_core::VERSION);
        }
    }

    Ok(())
}
