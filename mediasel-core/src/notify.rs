//! Explicit invalidation graph for derived presentation values.
//!
//! Producers call [`ChangeNotifier::notify`] after they mutate the state they
//! own. The bump travels up to every linked parent, so an aggregate learns
//! about a change in any of its entries without polling. Derived values are
//! cached in a [`Memo`] tagged with the version they were computed at and are
//! recomputed on the next read after the version moves.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub struct ChangeNotifier {
    version: watch::Sender<u64>,
    parent: Option<Arc<ChangeNotifier>>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("version", &self.version())
            .field("observers", &self.version.receiver_count())
            .field("linked", &self.parent.is_some())
            .finish()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            version,
            parent: None,
        }
    }

    /// Notifier whose bumps also invalidate `parent`.
    pub fn linked(parent: Arc<ChangeNotifier>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            version,
            parent: Some(parent),
        }
    }

    pub fn notify(&self) {
        // send_modify updates the value even when nobody is subscribed.
        self.version.send_modify(|version| *version = version.wrapping_add(1));
        if let Some(parent) = &self.parent {
            parent.notify();
        }
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Version stream starting with the current version.
    pub fn updates(&self) -> WatchStream<u64> {
        WatchStream::new(self.subscribe())
    }
}

/// Single-slot cache keyed by a notifier version.
pub struct Memo<T> {
    slot: Mutex<Option<(u64, T)>>,
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached_at = self.slot.lock().as_ref().map(|(version, _)| *version);
        f.debug_struct("Memo").field("cached_at", &cached_at).finish()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> Memo<T> {

    /// Cached value for `version`, computing it if the cache is stale.
    ///
    /// `compute` runs without the slot lock held. A value computed for an
    /// older version never replaces one computed for a newer version.
    pub fn get_or_compute(&self, version: u64, compute: impl FnOnce() -> T) -> T {
        if let Some((cached_at, value)) = self.slot.lock().as_ref()
            && *cached_at == version
        {
            return value.clone();
        }

        let value = compute();

        let mut slot = self.slot.lock();
        let stale = slot
            .as_ref()
            .is_none_or(|(cached_at, _)| *cached_at <= version);
        if stale {
            *slot = Some((version, value.clone()));
        }
        value
    }
}
