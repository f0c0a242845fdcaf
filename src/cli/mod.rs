use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod info;
mod merge;
mod pretty;

pub use config::Config;

/// sotool - Inspect and rewrite PharmML Standardised Output files
#[derive(Parser)]
#[command(name = "sotool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file (see sotool.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append the SOBlocks of other documents to a document
    Merge {
        /// Document that receives the blocks; it is rewritten in place
        #[arg(value_name = "DEST")]
        dest: PathBuf,

        /// Documents whose blocks are appended, in order
        #[arg(value_name = "SOURCES", required = true)]
        sources: Vec<PathBuf>,
    },

    /// Rewrite a document with indentation
    Pretty {
        /// Document to rewrite
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write here instead of replacing the input
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Display the contents of a document
    Info {
        /// Document to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    /// Number of `-v` flags given
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Set up `env_logger`; `RUST_LOG` still takes precedence
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Run the selected subcommand
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Merge { dest, sources } => merge::run(dest, sources, &config),
        Commands::Pretty { file, output } => pretty::run(file, output, &config),
        Commands::Info { file } => info::run(file),
    }
}
