//! CLI argument definitions using clap
//!
//! - implnav find --model m.json --file a.kt --offset 42
//! - implnav find --model m.json --file a.kt --line 2 --column 9
//! - implnav symbols --model m.json

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "implnav")]
#[command(about = "Find implementations of the symbol under the cursor")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON or TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find implementations of the symbol at a position
    Find(FindArgs),

    /// List the declarations of a program model
    Symbols {
        /// Program model file (JSON or TOML)
        #[arg(long)]
        model: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FindArgs {
    /// Program model file (JSON or TOML)
    #[arg(long)]
    pub model: PathBuf,

    /// Document path as recorded in the model
    #[arg(long)]
    pub file: String,

    /// Byte offset of the cursor
    #[arg(long, conflicts_with_all = ["line", "column"], required_unless_present = "line")]
    pub offset: Option<usize>,

    /// 1-based cursor line
    #[arg(long, requires = "column")]
    pub line: Option<u32>,

    /// 1-based cursor column
    #[arg(long, requires = "line")]
    pub column: Option<u32>,

    /// Print the final report as JSON instead of streaming rows
    #[arg(long)]
    pub json: bool,

    /// Cancel the search after this many deliveries
    #[arg(long)]
    pub cancel_after: Option<usize>,
}
