//! Fixed set of source presentations for one search, plus the sorted and
//! summary views a source picker renders.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use mediasel_contracts::source_result::MediaSourceResult;
use mediasel_model::{MediaSourceId, MediaSourceStateKind};
use once_cell::sync::Lazy;
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::DropGuard;
use tracing::{debug, info};

use crate::notify::{ChangeNotifier, Memo};
use crate::presentation::{MediaSourceResultPresentation, PresentationOptions};
use crate::scope::TaskScope;

/// Rank given to disabled sources so they sort below every enabled one.
const DISABLED_RANK: i64 = i64::MIN;

static EMPTY: Lazy<Arc<MediaSelectorSourceResults>> = Lazy::new(|| {
    Arc::new(MediaSelectorSourceResults {
        list: Arc::<[MediaSourceResultPresentation]>::from(Vec::new()),
        notifier: Arc::new(ChangeNotifier::new()),
        sorted: Memo::new(),
        summary: Memo::new(),
        scope: None,
        _guard: None,
    })
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Summary {
    any_loading: bool,
    enabled: usize,
    failed: usize,
}

/// Aggregate over the presentations of every source taking part in a search.
///
/// Immutable once built: a different set of sources means a new aggregate.
/// All entries share one child scope that is cancelled when the aggregate is
/// dropped (or [`cancel`](Self::cancel)led), which stops every subscription of
/// this generation. Derived views are memoised and recomputed after any entry
/// reports a change.
pub struct MediaSelectorSourceResults {
    list: Arc<[MediaSourceResultPresentation]>,
    notifier: Arc<ChangeNotifier>,
    sorted: Memo<Arc<[MediaSourceResultPresentation]>>,
    summary: Memo<Summary>,
    scope: Option<TaskScope>,
    _guard: Option<DropGuard>,
}

impl fmt::Debug for MediaSelectorSourceResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSelectorSourceResults")
            .field("total_source_count", &self.total_source_count())
            .field("version", &self.version())
            .field("scope", &self.scope)
            .finish()
    }
}

impl MediaSelectorSourceResults {
    pub fn new(
        sources: Vec<Arc<dyn MediaSourceResult>>,
        scope: &TaskScope,
    ) -> Arc<Self> {
        Self::with_options(sources, scope, &PresentationOptions::default())
    }

    pub fn with_options(
        sources: Vec<Arc<dyn MediaSourceResult>>,
        scope: &TaskScope,
        options: &PresentationOptions,
    ) -> Arc<Self> {
        if sources.is_empty() {
            return Self::empty();
        }

        let scope = scope.child();
        let notifier = Arc::new(ChangeNotifier::new());
        let list: Arc<[MediaSourceResultPresentation]> = sources
            .into_iter()
            .map(|source| {
                MediaSourceResultPresentation::linked(
                    source,
                    &scope,
                    options,
                    Arc::clone(&notifier),
                )
            })
            .collect();

        debug!(
            target: "mediasel::aggregate",
            sources = list.len(),
            "built source result aggregate"
        );

        Arc::new(Self {
            list,
            notifier,
            sorted: Memo::new(),
            summary: Memo::new(),
            _guard: Some(scope.drop_guard()),
            scope: Some(scope),
        })
    }

    /// Shared aggregate for searches with no sources configured.
    pub fn empty() -> Arc<Self> {
        Arc::clone(&EMPTY)
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Entries in the order the sources were supplied.
    pub fn list(&self) -> &[MediaSourceResultPresentation] {
        &self.list
    }

    /// Entries in display order: enabled sources by descending result count,
    /// then disabled sources; ties broken by ascending source id.
    pub fn list_sorted(&self) -> Arc<[MediaSourceResultPresentation]> {
        let version = self.notifier.version();
        self.sorted
            .get_or_compute(version, || sort_for_display(&self.list))
    }

    pub fn any_loading(&self) -> bool {
        self.summary().any_loading
    }

    pub fn enabled_source_count(&self) -> usize {
        self.summary().enabled
    }

    pub fn failed_source_count(&self) -> usize {
        self.summary().failed
    }

    pub fn total_source_count(&self) -> usize {
        self.list.len()
    }

    /// Restart every entry currently in the failed state. Returns how many
    /// restarts were requested.
    pub fn restart_failed(&self) -> usize {
        let failed: Vec<&MediaSourceResultPresentation> =
            self.list.iter().filter(|entry| entry.is_failed()).collect();
        for entry in &failed {
            entry.restart();
        }
        if !failed.is_empty() {
            info!(
                target: "mediasel::aggregate",
                restarted = failed.len(),
                "restarting failed sources"
            );
        }
        failed.len()
    }

    /// Stop all subscriptions of this aggregate. Entries keep their last
    /// applied values.
    pub fn cancel(&self) {
        if let Some(scope) = &self.scope {
            scope.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.as_ref().is_some_and(TaskScope::is_cancelled)
    }

    /// Counter bumped whenever any entry changes.
    pub fn version(&self) -> u64 {
        self.notifier.version()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    pub fn updates(&self) -> WatchStream<u64> {
        self.notifier.updates()
    }

    /// Serialisable view of the aggregate in display order.
    pub fn snapshot(&self) -> SourceResultsSnapshot {
        let summary = self.summary();
        SourceResultsSnapshot {
            total_source_count: self.total_source_count(),
            enabled_source_count: summary.enabled,
            failed_source_count: summary.failed,
            any_loading: summary.any_loading,
            entries: self
                .list_sorted()
                .iter()
                .map(|entry| SourceEntrySnapshot {
                    media_source_id: entry.media_source_id().clone(),
                    state: entry.state_kind(),
                    total_count: entry.total_count(),
                })
                .collect(),
        }
    }

    fn summary(&self) -> Summary {
        let version = self.notifier.version();
        self.summary.get_or_compute(version, || {
            self.list.iter().fold(Summary::default(), |mut acc, entry| {
                let kind = entry.state_kind();
                acc.any_loading |= kind == MediaSourceStateKind::Working;
                if kind != MediaSourceStateKind::Disabled {
                    acc.enabled += 1;
                }
                if kind == MediaSourceStateKind::Failed {
                    acc.failed += 1;
                }
                acc
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceResultsSnapshot {
    pub total_source_count: usize,
    pub enabled_source_count: usize,
    pub failed_source_count: usize,
    pub any_loading: bool,
    pub entries: Vec<SourceEntrySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntrySnapshot {
    pub media_source_id: MediaSourceId,
    pub state: MediaSourceStateKind,
    pub total_count: usize,
}

/// Point-in-time sort key of one entry. Taken once per sort so the order
/// stays total while entries are being updated concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DisplayKey {
    rank: i64,
    media_source_id: MediaSourceId,
}

impl DisplayKey {
    fn of(entry: &MediaSourceResultPresentation) -> Self {
        let rank = if entry.is_disabled() {
            DISABLED_RANK
        } else {
            i64::try_from(entry.total_count()).unwrap_or(i64::MAX)
        };
        Self {
            rank,
            media_source_id: entry.media_source_id().clone(),
        }
    }
}

fn display_order(a: &DisplayKey, b: &DisplayKey) -> Ordering {
    b.rank
        .cmp(&a.rank)
        .then_with(|| a.media_source_id.cmp(&b.media_source_id))
}

fn sort_for_display(
    list: &[MediaSourceResultPresentation],
) -> Arc<[MediaSourceResultPresentation]> {
    let mut keyed: Vec<(DisplayKey, &MediaSourceResultPresentation)> = list
        .iter()
        .map(|entry| (DisplayKey::of(entry), entry))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| display_order(a, b));
    keyed.into_iter().map(|(_, entry)| entry.clone()).collect()
}
