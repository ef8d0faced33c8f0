//! seqbuf CLI
//!
//! Command-line tools for looking at files through segmented sequences.
//!
//! # Commands
//!
//! - `inspect` - Show how a file is laid out across segments
//! - `split` - Split a file into delimited records with a reader

mod commands;
mod error;

use clap::{Parser, Subcommand};
use seqbuf_core::WriterConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::OutputFormat;

/// Segmented buffer inspection tools.
#[derive(Parser)]
#[command(name = "seqbuf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Bytes per segment when loading the input
    #[arg(global = true, long, default_value_t = 4096)]
    segment_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a file is laid out across segments
    Inspect {
        /// Input file
        path: PathBuf,

        /// Show segment details
        #[arg(short, long)]
        segments: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Split a file into delimited records
    Split {
        /// Input file
        path: PathBuf,

        /// Record delimiter; understands \r, \n, \t, \0, \\ and \xNN
        #[arg(short, long, default_value = r"\r\n")]
        delimiter: String,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
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

    let config = WriterConfig::new().segment_size(cli.segment_size);

    match cli.command {
        Commands::Inspect {
            path,
            segments,
            format,
        } => {
            commands::inspect::run(&path, config, segments, format)?;
        }
        Commands::Split {
            path,
            delimiter,
            limit,
            format,
        } => {
            let delimiter = commands::parse_delimiter(&delimiter)?;
            commands::split::run(&path, config, &delimiter, limit, format)?;
        }
        Commands::Version => {
            println!("seqbuf CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("seqbuf core v{}", seqbuf_core::VERSION);
        }
    }

    Ok(())
}
