//! Implnav CLI application
//!
//! Finds the implementations of the symbol at a position in a program model
//! file and streams them to the terminal as the background search finds them.
//!
//! ```bash
//! implnav find --model demos/shapes.json --file shapes.kt --line 2 --column 9
//! implnav symbols --model demos/shapes.json
//! ```

mod args;
mod commands;
mod console;
mod logging;
mod router;

use args::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = implnav_core::load_config(cli.config.as_deref())?;

    // RUST_LOG wins over --verbose and the configured level
    logging::init(&config.logging, cli.verbose);

    router::route(cli, config).await
}
