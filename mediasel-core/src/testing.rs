//! In-memory sources for exercising the presentation layer without a fetch
//! subsystem.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mediasel_contracts::source_result::MediaSourceResult;
use mediasel_model::{Media, MediaSourceId, MediaSourceState};
use tokio::sync::watch;

/// Source whose streams are driven by hand.
#[derive(Debug)]
pub struct FakeMediaSourceResult {
    id: MediaSourceId,
    state: watch::Sender<MediaSourceState>,
    results: watch::Sender<Arc<[Media]>>,
    restarts: AtomicUsize,
}

impl FakeMediaSourceResult {
    pub fn new(id: &str) -> Arc<Self> {
        Self::with_state(id, MediaSourceState::Working)
    }

    pub fn with_state(id: &str, state: MediaSourceState) -> Arc<Self> {
        let (state, _) = watch::channel(state);
        let (results, _) = watch::channel(Arc::<[Media]>::from(Vec::new()));
        Arc::new(Self {
            id: MediaSourceId::new(id),
            state,
            results,
            restarts: AtomicUsize::new(0),
        })
    }

    pub fn set_state(&self, state: MediaSourceState) {
        self.state.send_replace(state);
    }

    /// Replace the result list with `count` generated entries.
    pub fn push_results(&self, count: usize) -> Arc<[Media]> {
        let results: Arc<[Media]> = (0..count)
            .map(|index| {
                Media::new(
                    format!("{}-{index}", self.id),
                    self.id.clone(),
                    format!("[{}] Episode {:02}", self.id, index + 1),
                )
            })
            .collect();
        self.results.send_replace(Arc::clone(&results));
        results
    }

    /// Publish `count` results and flip the state to `Succeeded`.
    pub fn succeed_with(&self, count: usize) {
        let results = self.push_results(count);
        self.set_state(MediaSourceState::Succeeded(results));
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl MediaSourceResult for FakeMediaSourceResult {
    fn media_source_id(&self) -> MediaSourceId {
        self.id.clone()
    }

    fn state(&self) -> watch::Receiver<MediaSourceState> {
        self.state.subscribe()
    }

    fn results(&self) -> watch::Receiver<Arc<[Media]>> {
        self.results.subscribe()
    }

    fn restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Erase a set of fakes into the handle type the aggregate takes.
pub fn handles(
    fakes: &[Arc<FakeMediaSourceResult>],
) -> Vec<Arc<dyn MediaSourceResult>> {
    fakes
        .iter()
        .map(|fake| Arc::clone(fake) as Arc<dyn MediaSourceResult>)
        .collect()
}

/// Poll `condition` until it holds or two seconds pass. Returns whether it
/// held.
pub async fn settle(condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
