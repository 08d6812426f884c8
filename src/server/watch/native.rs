use std::path::PathBuf;
use std::sync::mpsc::Sender;

use log::debug;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::WatchEvent;
use crate::utils::error::{AlvuError, Result};

/// Watch `roots` with the platform's file notification API.
///
/// Sends the first path of each create, modify or remove event. Metadata
/// only changes are ignored.
pub fn watch_native(roots: &[PathBuf], tx: Sender<WatchEvent>) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if !is_relevant(&event.kind) {
                return;
            }
            if let Some(path) = event.paths.into_iter().next() {
                debug!("Change event: {}", path.display());
                let _ = tx.send(Ok(path));
            }
        }
        Err(e) => {
            let _ = tx.send(Err(AlvuError::Watch(e.to_string())));
        }
    })
    .map_err(|e| AlvuError::Watch(e.to_string()))?;

    for root in roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| AlvuError::Watch(format!("cannot watch {}: {}", root.display(), e)))?;
    }

    Ok(watcher)
}

fn is_relevant(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}
