//! Display-facing adapter over one source's fetch state.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use mediasel_contracts::source_result::MediaSourceResult;
use mediasel_model::{Media, MediaSourceId, MediaSourceState, MediaSourceStateKind};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::notify::ChangeNotifier;
use crate::scope::TaskScope;

/// Knobs for the presentation layer's observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PresentationOptions {
    /// Log every applied state transition at `debug` instead of `trace`.
    pub trace_transitions: bool,
}

/// Synchronously readable projection of a [`MediaSourceResult`].
///
/// The wrapper owns no fetch state of its own: a subscription task spawned on
/// the supplied [`TaskScope`] copies the latest state and result count over
/// as they are pushed. Reads never block and return the most recently applied
/// values. Clones share the same projection.
#[derive(Clone)]
pub struct MediaSourceResultPresentation {
    inner: Arc<PresentationInner>,
}

struct PresentationInner {
    media_source_id: MediaSourceId,
    source: Arc<dyn MediaSourceResult>,
    state: RwLock<MediaSourceState>,
    total_count: AtomicUsize,
    notifier: ChangeNotifier,
}

impl fmt::Debug for MediaSourceResultPresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSourceResultPresentation")
            .field("media_source_id", &self.inner.media_source_id)
            .field("state", &self.state_kind())
            .field("total_count", &self.total_count())
            .finish()
    }
}

impl MediaSourceResultPresentation {
    pub fn new(source: Arc<dyn MediaSourceResult>, scope: &TaskScope) -> Self {
        Self::with_options(source, scope, &PresentationOptions::default())
    }

    pub fn with_options(
        source: Arc<dyn MediaSourceResult>,
        scope: &TaskScope,
        options: &PresentationOptions,
    ) -> Self {
        Self::spawn(source, scope, options, ChangeNotifier::new())
    }

    /// Wrapper whose changes also invalidate `parent`.
    pub(crate) fn linked(
        source: Arc<dyn MediaSourceResult>,
        scope: &TaskScope,
        options: &PresentationOptions,
        parent: Arc<ChangeNotifier>,
    ) -> Self {
        Self::spawn(source, scope, options, ChangeNotifier::linked(parent))
    }

    fn spawn(
        source: Arc<dyn MediaSourceResult>,
        scope: &TaskScope,
        options: &PresentationOptions,
        notifier: ChangeNotifier,
    ) -> Self {
        let media_source_id = source.media_source_id();
        let mut state_rx = source.state();
        let results_rx = source.results();
        let initial = state_rx.borrow_and_update().clone();

        let inner = Arc::new(PresentationInner {
            media_source_id: media_source_id.clone(),
            source,
            state: RwLock::new(initial),
            total_count: AtomicUsize::new(0),
            notifier,
        });

        debug!(
            target: "mediasel::presentation",
            source = %media_source_id,
            "subscribing to source streams"
        );
        scope.spawn(
            "source-presentation",
            observe(
                Arc::downgrade(&inner),
                state_rx,
                results_rx,
                options.trace_transitions,
            ),
        );

        Self { inner }
    }

    pub fn media_source_id(&self) -> &MediaSourceId {
        &self.inner.media_source_id
    }

    pub fn state(&self) -> MediaSourceState {
        self.inner.state.read().clone()
    }

    pub fn state_kind(&self) -> MediaSourceStateKind {
        self.inner.state.read().kind()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.read().is_working()
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.state.read().is_disabled()
    }

    pub fn is_failed(&self) -> bool {
        self.inner.state.read().is_failed()
    }

    /// Length of the last result list observed while the source was enabled.
    /// `0` before the first emission.
    pub fn total_count(&self) -> usize {
        self.inner.total_count.load(Ordering::Acquire)
    }

    /// Ask the source for a new fetch cycle. Nothing local changes until the
    /// source pushes its next state.
    pub fn restart(&self) {
        debug!(
            target: "mediasel::presentation",
            source = %self.inner.media_source_id,
            "restart requested"
        );
        self.inner.source.restart();
    }

    /// Counter bumped after every applied update.
    pub fn version(&self) -> u64 {
        self.inner.notifier.version()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.notifier.subscribe()
    }
}

impl PresentationInner {
    /// Returns `true` when the source left `Disabled`, in which case the
    /// result list has to be re-read: emissions seen while disabled were
    /// dropped.
    fn apply_state(&self, next: MediaSourceState, trace_transitions: bool) -> bool {
        let previous = {
            let mut state = self.state.write();
            if *state == next {
                return false;
            }
            std::mem::replace(&mut *state, next)
        };

        let current = self.state.read().kind();
        if trace_transitions {
            debug!(
                target: "mediasel::presentation",
                source = %self.media_source_id,
                from = %previous.kind(),
                to = %current,
                "source state changed"
            );
        } else {
            trace!(
                target: "mediasel::presentation",
                source = %self.media_source_id,
                from = %previous.kind(),
                to = %current,
                "source state changed"
            );
        }
        self.notifier.notify();
        previous.is_disabled() && current != MediaSourceStateKind::Disabled
    }

    fn apply_results(&self, results: &[Media]) {
        if self.state.read().is_disabled() {
            trace!(
                target: "mediasel::presentation",
                source = %self.media_source_id,
                "ignoring results while disabled"
            );
            return;
        }

        let count = results.len();
        let previous = self.total_count.swap(count, Ordering::AcqRel);
        if previous != count {
            trace!(
                target: "mediasel::presentation",
                source = %self.media_source_id,
                previous,
                count,
                "result count changed"
            );
            self.notifier.notify();
        }
    }
}

async fn observe(
    inner: Weak<PresentationInner>,
    mut state_rx: watch::Receiver<MediaSourceState>,
    mut results_rx: watch::Receiver<Arc<[Media]>>,
    trace_transitions: bool,
) {
    // The state was sampled at construction; the result list starts at zero
    // and picks up whatever the source already holds.
    {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let latest = state_rx.borrow_and_update().clone();
        inner.apply_state(latest, trace_transitions);
        let results = Arc::clone(&results_rx.borrow_and_update());
        inner.apply_results(&results);
    }

    let mut state_open = true;
    let mut results_open = true;

    while state_open || results_open {
        // State first: a re-enable must land before the results after it.
        tokio::select! {
            biased;
            changed = state_rx.changed(), if state_open => {
                if changed.is_err() {
                    state_open = false;
                    continue;
                }
                let next = state_rx.borrow_and_update().clone();
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                if inner.apply_state(next, trace_transitions) {
                    let results = Arc::clone(&results_rx.borrow_and_update());
                    inner.apply_results(&results);
                }
            }
            changed = results_rx.changed(), if results_open => {
                if changed.is_err() {
                    results_open = false;
                    continue;
                }
                let results = Arc::clone(&results_rx.borrow_and_update());
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                inner.apply_results(&results);
            }
        }
    }

    if let Some(inner) = inner.upgrade() {
        debug!(
            target: "mediasel::presentation",
            source = %inner.media_source_id,
            "source streams closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMediaSourceResult, settle};
    use mediasel_model::FetchFailureKind;

    fn scope() -> TaskScope {
        TaskScope::current().expect("tests run on a tokio runtime")
    }

    #[tokio::test]
    async fn state_is_sampled_at_construction() {
        let fake = FakeMediaSourceResult::with_state("mikan", MediaSourceState::Disabled);
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());

        assert_eq!(presentation.media_source_id().as_str(), "mikan");
        assert!(presentation.is_disabled());
        assert!(!presentation.is_loading());
        assert_eq!(presentation.total_count(), 0);
    }

    #[tokio::test]
    async fn derived_flags_follow_pushed_state() {
        let fake = FakeMediaSourceResult::new("dmhy");
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());
        assert!(presentation.is_loading());

        fake.set_state(MediaSourceState::failed(FetchFailureKind::Network, "reset"));
        assert!(settle(|| presentation.is_failed()).await);
        assert!(!presentation.is_loading());
        assert!(!presentation.is_disabled());

        fake.set_state(MediaSourceState::Working);
        assert!(settle(|| presentation.is_loading()).await);
        assert!(!presentation.is_failed());
    }

    #[tokio::test]
    async fn total_count_tracks_result_stream() {
        let fake = FakeMediaSourceResult::new("nyaa");
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());

        fake.push_results(3);
        assert!(settle(|| presentation.total_count() == 3).await);

        fake.succeed_with(7);
        assert!(settle(|| presentation.total_count() == 7).await);
        assert!(settle(|| !presentation.is_loading()).await);
    }

    #[tokio::test]
    async fn results_already_present_are_picked_up() {
        let fake = FakeMediaSourceResult::new("acg.rip");
        fake.succeed_with(4);

        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());

        assert!(settle(|| presentation.total_count() == 4).await);
    }

    #[tokio::test]
    async fn total_count_freezes_while_disabled() {
        let fake = FakeMediaSourceResult::new("bangumi.moe");
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());

        fake.push_results(2);
        assert!(settle(|| presentation.total_count() == 2).await);

        fake.set_state(MediaSourceState::Disabled);
        assert!(settle(|| presentation.is_disabled()).await);

        let version = presentation.version();
        fake.push_results(9);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(presentation.total_count(), 2);
        assert_eq!(presentation.version(), version);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn results_after_re_enable_are_counted() {
        let scope = scope();
        for round in 0..200 {
            let fake = FakeMediaSourceResult::with_state(
                &format!("dmhy-{round}"),
                MediaSourceState::Disabled,
            );
            let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope);

            fake.set_state(MediaSourceState::Working);
            fake.push_results(5);

            assert!(
                settle(|| presentation.total_count() == 5).await,
                "round {round}: count stuck at {}",
                presentation.total_count()
            );
            assert!(presentation.is_loading());
        }
    }

    #[tokio::test]
    async fn results_pushed_while_disabled_apply_once_re_enabled() {
        let fake = FakeMediaSourceResult::new("nyaa");
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());
        fake.push_results(2);
        assert!(settle(|| presentation.total_count() == 2).await);

        fake.set_state(MediaSourceState::Disabled);
        assert!(settle(|| presentation.is_disabled()).await);
        fake.push_results(6);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(presentation.total_count(), 2);

        fake.set_state(MediaSourceState::Working);

        assert!(settle(|| presentation.total_count() == 6).await);
        assert!(presentation.is_loading());
    }

    #[tokio::test]
    async fn restart_delegates_without_touching_fields() {
        let fake = FakeMediaSourceResult::with_state(
            "mikan",
            MediaSourceState::failed(FetchFailureKind::Timeout, "gave up"),
        );
        fake.push_results(1);
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());
        assert!(settle(|| presentation.total_count() == 1).await);

        let version = presentation.version();
        presentation.restart();

        assert_eq!(fake.restart_count(), 1);
        assert!(presentation.is_failed());
        assert_eq!(presentation.total_count(), 1);
        assert_eq!(presentation.version(), version);
    }

    #[tokio::test]
    async fn subscribers_are_woken_on_change() {
        let fake = FakeMediaSourceResult::new("dmhy");
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope());
        let mut rx = presentation.subscribe();

        fake.set_state(MediaSourceState::Disabled);

        tokio::time::timeout(std::time::Duration::from_secs(1), rx.changed())
            .await
            .expect("change notification")
            .expect("notifier alive");
        assert!(presentation.is_disabled());
    }

    #[tokio::test]
    async fn cancelled_scope_stops_updates() {
        let fake = FakeMediaSourceResult::new("mikan");
        let scope = scope();
        let presentation = MediaSourceResultPresentation::new(fake.clone(), &scope);

        scope.cancel();
        tokio::task::yield_now().await;
        fake.set_state(MediaSourceState::Disabled);
        fake.push_results(5);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(presentation.is_loading());
        assert_eq!(presentation.total_count(), 0);
    }
}
