//! Refresh notifications and the cache file watch

pub mod file_watch;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::config::ConfigKey;

pub use file_watch::{FileWatch, MtimeGate};

/// Why the host should ask for targets again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    ConfigChanged(ConfigKey),
    CacheModified,
}

/// Fan-out of refresh notifications to every subscriber
#[derive(Debug, Clone, Default)]
pub struct RefreshHub {
    subscribers: Arc<Mutex<Vec<Sender<RefreshReason>>>>,
}

impl RefreshHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<RefreshReason> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    /// Deliver to every live subscriber, dropping the ones that hung up.
    /// Returns the number of deliveries.
    pub fn emit(&self, reason: RefreshReason) -> usize {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return 0;
        };
        subscribers.retain(|tx| tx.send(reason).is_ok());
        tracing::debug!("Refresh requested ({:?}), {} subscriber(s)", reason, subscribers.len());
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives() {
        let hub = RefreshHub::new();
        let a = hub.subscribe();
        let b = hub.subscribe();
        assert_eq!(hub.emit(RefreshReason::CacheModified), 2);
        assert_eq!(a.try_recv().unwrap(), RefreshReason::CacheModified);
        assert_eq!(b.try_recv().unwrap(), RefreshReason::CacheModified);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let hub = RefreshHub::new();
        let kept = hub.subscribe();
        drop(hub.subscribe());
        assert_eq!(hub.emit(RefreshReason::ConfigChanged(ConfigKey::Generator)), 1);
        assert_eq!(
            kept.try_recv().unwrap(),
            RefreshReason::ConfigChanged(ConfigKey::Generator)
        );
    }
}
