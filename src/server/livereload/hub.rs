use std::sync::{Mutex, PoisonError};

use log::debug;
use tokio::sync::oneshot;

/// Browsers waiting for the next reload.
///
/// Each connection subscribes once; a broadcast notifies and forgets every
/// subscriber, so clients subscribe again after reloading.
#[derive(Debug, Default)]
pub struct LiveReloadHub {
    clients: Mutex<Vec<oneshot::Sender<()>>>,
}

impl LiveReloadHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().push(tx);
        rx
    }

    /// Notify every subscriber and clear the registry. Returns how many
    /// were still listening.
    pub fn broadcast(&self) -> usize {
        let clients = std::mem::take(&mut *self.lock());
        let notified = clients.into_iter().filter_map(|tx| tx.send(()).ok()).count();
        debug!("Sent reload to {} client(s)", notified);
        notified
    }

    pub fn client_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<oneshot::Sender<()>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_notifies_and_clears() {
        let hub = LiveReloadHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.client_count(), 2);

        assert_eq!(hub.broadcast(), 2);

        assert_eq!(hub.client_count(), 0);
        assert!(first.try_recv().is_ok());
        assert!(second.try_recv().is_ok());
        assert_eq!(hub.broadcast(), 0);
    }

    #[test]
    fn test_dropped_clients_are_skipped() {
        let hub = LiveReloadHub::new();
        let gone = hub.subscribe();
        let mut live = hub.subscribe();
        drop(gone);

        assert_eq!(hub.broadcast(), 1);
        assert!(live.try_recv().is_ok());
    }
}
