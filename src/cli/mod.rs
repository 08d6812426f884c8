pub mod commands;
pub mod logging;
pub mod types;

use clap::Parser;

use crate::builder::BuildContext;
use crate::config::{load_config, validate_config};
use crate::utils::error::BoxResult;

/// Prefix for fatal errors printed on exit
const ERROR_PREFIX: &str = "[alvu]";

/// Run the command-line interface
pub async fn run() {
    let cli = types::Cli::parse();

    // Initialize logging system
    logging::init_logging(cli.debug);

    if let Err(e) = execute(cli).await {
        eprintln!("{} {}", ERROR_PREFIX, e);
        std::process::exit(1);
    }
}

async fn execute(cli: types::Cli) -> BoxResult<()> {
    let mut config = load_config(&cli.path)?;
    cli.apply_overrides(&mut config);
    validate_config(&config)?;

    let ctx = BuildContext::new(config)?;
    if cli.serve {
        commands::handle_serve_command(ctx).await
    } else {
        commands::handle_build_command(&ctx).map(|_| ())
    }
}
