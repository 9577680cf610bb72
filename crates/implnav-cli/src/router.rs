//! Command routing logic for CLI

use implnav_core::NavigationConfig;

use crate::args::{Cli, Commands};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: NavigationConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Find(args) => commands::find::execute(&args, config, cli.verbose).await,
        Commands::Symbols { model } => commands::symbols::execute(&model),
    }
}
