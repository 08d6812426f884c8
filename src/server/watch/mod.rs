//! Change detection for the dev server.
//!
//! Both watchers feed the same channel with one changed path per event.
//! An `Err` on the channel ends the serve session.

pub mod native;
pub mod poller;

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::{error, info};
use notify::RecommendedWatcher;

pub use native::watch_native;
pub use poller::Poller;

use crate::config::{Config, WatcherKind};
use crate::utils::error::Result;

/// A changed path, or the error that stopped the watcher
pub type WatchEvent = Result<PathBuf>;

/// Keeps the active watcher alive for as long as it is held
pub enum WatchHandle {
    Polling(JoinHandle<()>),
    Native(RecommendedWatcher),
}

/// Directories watched while serving: pages, plus public assets and hooks
/// when they exist
pub fn watched_roots(config: &Config) -> Vec<PathBuf> {
    let mut roots = vec![config.pages_dir()];
    for optional in [config.public_dir(), config.hooks_path()] {
        if optional.is_dir() && !roots.contains(&optional) {
            roots.push(optional);
        }
    }
    roots
}

/// Start the watcher selected in `config`
pub fn start_watching(config: &Config, tx: Sender<WatchEvent>) -> Result<WatchHandle> {
    let roots = watched_roots(config);
    for root in &roots {
        info!("Watching for changes in {}", root.display());
    }

    match config.watcher {
        WatcherKind::Native => Ok(WatchHandle::Native(watch_native(&roots, tx)?)),
        WatcherKind::Poll => {
            let mut poller = Poller::new();
            for root in &roots {
                poller.add(root)?;
            }
            let interval = config.poll_interval();
            let handle = thread::Builder::new()
                .name("alvu-poller".to_string())
                .spawn(move || poller.run(interval, tx))
                .map_err(|e| {
                    error!("Failed to start poller: {}", e);
                    e
                })?;
            Ok(WatchHandle::Polling(handle))
        }
    }
}
