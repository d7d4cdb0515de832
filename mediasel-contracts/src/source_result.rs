use std::fmt::Debug;
use std::sync::Arc;

use mediasel_model::{Media, MediaSourceId, MediaSourceState};
use tokio::sync::watch;

/// Handle onto one source's participation in a search.
///
/// Implemented by the fetch subsystem. The fetch task is the only writer of
/// both streams; consumers subscribe and read.
pub trait MediaSourceResult: Debug + Send + Sync {
    fn media_source_id(&self) -> MediaSourceId;

    /// Lifecycle of the current fetch.
    fn state(&self) -> watch::Receiver<MediaSourceState>;

    /// Results gathered so far. Only advances while the source is enabled.
    fn results(&self) -> watch::Receiver<Arc<[Media]>>;

    /// Ask the fetch subsystem to run a new fetch cycle. Fire and forget.
    fn restart(&self);

    /// Snapshot of the state stream's latest value.
    fn current_state(&self) -> MediaSourceState {
        self.state().borrow().clone()
    }
}

impl<T: MediaSourceResult + ?Sized> MediaSourceResult for Arc<T> {
    fn media_source_id(&self) -> MediaSourceId {
        (**self).media_source_id()
    }

    fn state(&self) -> watch::Receiver<MediaSourceState> {
        (**self).state()
    }

    fn results(&self) -> watch::Receiver<Arc<[Media]>> {
        (**self).results()
    }

    fn restart(&self) {
        (**self).restart()
    }
}
