//! Holder for "the current aggregate" of a source picker.
//!
//! Every time the set of sources changes (new search, different episode,
//! source preferences edited) the session builds a fresh aggregate and
//! cancels the previous generation's subscriptions.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mediasel_contracts::source_result::MediaSourceResult;
use parking_lot::RwLock;
use tracing::info;

use crate::aggregate::MediaSelectorSourceResults;
use crate::presentation::PresentationOptions;
use crate::scope::TaskScope;

pub struct MediaSelectorSession {
    scope: TaskScope,
    options: PresentationOptions,
    current: RwLock<Arc<MediaSelectorSourceResults>>,
    generation: AtomicU64,
}

impl fmt::Debug for MediaSelectorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSelectorSession")
            .field("generation", &self.generation())
            .field("sources", &self.current().total_source_count())
            .field("closed", &self.is_closed())
            .field("options", &self.options)
            .finish()
    }
}

impl MediaSelectorSession {
    pub fn new(parent: &TaskScope, options: PresentationOptions) -> Self {
        Self {
            scope: parent.child(),
            options,
            current: RwLock::new(MediaSelectorSourceResults::empty()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn current(&self) -> Arc<MediaSelectorSourceResults> {
        Arc::clone(&self.current.read())
    }

    /// Number of aggregates built so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Swap in an aggregate over `sources`, stopping the previous one.
    pub fn replace(
        &self,
        sources: Vec<Arc<dyn MediaSourceResult>>,
    ) -> Arc<MediaSelectorSourceResults> {
        let next = MediaSelectorSourceResults::with_options(
            sources,
            &self.scope,
            &self.options,
        );
        let previous = std::mem::replace(&mut *self.current.write(), Arc::clone(&next));
        previous.cancel();

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(
            target: "mediasel::session",
            generation,
            sources = next.total_source_count(),
            previous_sources = previous.total_source_count(),
            "source results replaced"
        );
        next
    }

    /// Drop back to the empty aggregate.
    pub fn clear(&self) -> Arc<MediaSelectorSourceResults> {
        self.replace(Vec::new())
    }

    /// Cancel every subscription owned by this session. Aggregates built
    /// afterwards start on a cancelled scope and never update.
    pub fn close(&self) {
        self.scope.cancel();
        let previous = std::mem::replace(
            &mut *self.current.write(),
            MediaSelectorSourceResults::empty(),
        );
        info!(
            target: "mediasel::session",
            generation = self.generation(),
            sources = previous.total_source_count(),
            "source session closed"
        );
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled()
    }
}
