use std::sync::mpsc::Receiver;

use log::{error, info};

use crate::builder::{rebuild_file, BuildContext};
use crate::server::livereload::LiveReloadHub;
use crate::server::watch::WatchEvent;
use crate::utils::error::Result;

/// Rebuild for each change event and reload connected browsers.
///
/// Build failures are logged and the loop keeps going. A watcher error
/// ends the loop and is returned. Returns `Ok` once every sender is gone.
pub fn handle_file_changes(rx: Receiver<WatchEvent>, ctx: &BuildContext, hub: &LiveReloadHub) -> Result<()> {
    for event in rx {
        let path = event?;
        info!("File change detected: {}", path.display());

        match rebuild_file(ctx, &path) {
            Ok(_) => {
                hub.broadcast();
            }
            Err(e) => error!("Error rebuilding site: {}", e),
        }
    }
    Ok(())
}
