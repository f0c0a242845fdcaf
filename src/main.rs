//! # sotool
//!
//! Command-line companion of the `soxml` library for PharmML Standardised
//! Output files.
//!
//! ## Usage
//!
//! ```bash
//! # Append the blocks of two runs to a combined document
//! sotool merge combined.SO.xml run1.SO.xml run2.SO.xml
//!
//! # Re-indent a document in place, or into another file
//! sotool pretty run.SO.xml -o run.pretty.SO.xml
//!
//! # Summarize blocks, tables, matrices and messages
//! sotool -v info run.SO.xml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
