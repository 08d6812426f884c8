use log::info;

use crate::builder::{build_site, BuildContext, BuildStats};
use crate::utils::error::BoxResult;

/// Build the site once
pub fn handle_build_command(ctx: &BuildContext) -> BoxResult<BuildStats> {
    let stats = build_site(ctx)?;
    info!("Site built successfully at {}", ctx.config.destination.display());
    Ok(stats)
}
