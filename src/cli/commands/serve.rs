use log::info;

use super::build::handle_build_command;
use crate::builder::BuildContext;
use crate::server;
use crate::utils::error::BoxResult;

/// Build, then serve and rebuild on changes until interrupted
pub async fn handle_serve_command(ctx: BuildContext) -> BoxResult<()> {
    handle_build_command(&ctx)?;
    info!("Starting development server...");
    server::serve(ctx).await
}
