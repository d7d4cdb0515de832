//! Sources that behave like real fetch tasks: they run on their own, push
//! state through watch channels and replay on restart.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mediasel_contracts::source_result::MediaSourceResult;
use mediasel_core::MediaSelectorSourceResults;
use mediasel_model::{FetchFailureKind, Media, MediaSourceId, MediaSourceState};
use tokio::sync::{Notify, watch};
use tokio_stream::StreamExt;

#[derive(Debug, Clone)]
pub enum Step {
    /// Publish a result list of this length.
    Emit(usize),
    Succeed,
    Fail(FetchFailureKind),
    Disable,
    Pause(Duration),
}

#[derive(Debug)]
pub struct ScriptedSource {
    id: MediaSourceId,
    state: watch::Sender<MediaSourceState>,
    results: watch::Sender<Arc<[Media]>>,
    restart: Notify,
    restarts: AtomicUsize,
}

impl ScriptedSource {
    /// Start a fetch task that plays `attempts[n]` on the n-th run, reusing
    /// the last attempt once they run out.
    pub fn start(id: &str, attempts: Vec<Vec<Step>>) -> Arc<Self> {
        let (state, _) = watch::channel(MediaSourceState::Working);
        let (results, _) = watch::channel(Arc::<[Media]>::from(Vec::new()));
        let source = Arc::new(Self {
            id: MediaSourceId::new(id),
            state,
            results,
            restart: Notify::new(),
            restarts: AtomicUsize::new(0),
        });

        let task = Arc::clone(&source);
        tokio::spawn(async move {
            let mut attempt = 0;
            loop {
                let script = attempts
                    .get(attempt)
                    .or_else(|| attempts.last())
                    .cloned()
                    .unwrap_or_default();
                task.run(script).await;
                task.restart.notified().await;
                task.state.send_replace(MediaSourceState::Working);
                task.results.send_replace(Arc::<[Media]>::from(Vec::new()));
                attempt += 1;
            }
        });

        source
    }

    async fn run(&self, script: Vec<Step>) {
        let mut latest: Arc<[Media]> = Arc::from(Vec::new());
        for step in script {
            tokio::time::sleep(Duration::from_millis(2)).await;
            match step {
                Step::Emit(count) => {
                    latest = (0..count)
                        .map(|index| {
                            Media::new(
                                format!("{}-{index}", self.id),
                                self.id.clone(),
                                format!("Episode {:02}", index + 1),
                            )
                        })
                        .collect();
                    self.results.send_replace(Arc::clone(&latest));
                }
                Step::Succeed => {
                    self.state.send_replace(MediaSourceState::Succeeded(
                        Arc::clone(&latest),
                    ));
                }
                Step::Fail(kind) => {
                    self.state.send_replace(MediaSourceState::failed(
                        kind,
                        "scripted failure",
                    ));
                }
                Step::Disable => {
                    self.state.send_replace(MediaSourceState::Disabled);
                }
                Step::Pause(duration) => tokio::time::sleep(duration).await,
            }
        }
    }

    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl MediaSourceResult for ScriptedSource {
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
        self.restart.notify_one();
    }
}

pub fn erase(
    sources: &[Arc<ScriptedSource>],
) -> Vec<Arc<dyn MediaSourceResult>> {
    sources
        .iter()
        .map(|source| Arc::clone(source) as Arc<dyn MediaSourceResult>)
        .collect()
}

/// Wait on the aggregate's change stream until `condition` holds.
pub async fn wait_for(
    results: &MediaSelectorSourceResults,
    condition: impl Fn(&MediaSelectorSourceResults) -> bool,
) {
    let mut updates = results.updates();
    tokio::time::timeout(Duration::from_secs(5), async {
        while updates.next().await.is_some() {
            if condition(results) {
                return;
            }
        }
        panic!("aggregate notifier closed");
    })
    .await
    .expect("condition should hold before the timeout");
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mediasel=debug")
        .with_test_writer()
        .try_init();
}
