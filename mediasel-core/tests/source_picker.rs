mod support;

use std::time::Duration;

use mediasel_core::{
    MediaSelectorSession, MediaSelectorSourceResults, PresentationOptions,
    TaskScope,
};
use mediasel_model::{FetchFailureKind, MediaSourceStateKind};

use support::{ScriptedSource, Step, erase, init_tracing, wait_for};

fn sorted_ids(results: &MediaSelectorSourceResults) -> Vec<String> {
    results
        .list_sorted()
        .iter()
        .map(|entry| entry.media_source_id().to_string())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_sources_settle_into_display_order() {
    init_tracing();
    let scope = TaskScope::current().expect("runtime");

    let mikan = ScriptedSource::start(
        "mikan",
        vec![vec![Step::Emit(1), Step::Emit(3), Step::Succeed]],
    );
    let dmhy = ScriptedSource::start(
        "dmhy",
        vec![vec![Step::Emit(2), Step::Emit(5), Step::Succeed]],
    );
    let nyaa = ScriptedSource::start("nyaa", vec![vec![Step::Disable]]);
    let acg = ScriptedSource::start(
        "acg.rip",
        vec![vec![
            Step::Pause(Duration::from_millis(10)),
            Step::Fail(FetchFailureKind::Network),
        ]],
    );

    let results = MediaSelectorSourceResults::new(
        erase(&[mikan.clone(), dmhy.clone(), nyaa.clone(), acg.clone()]),
        &scope,
    );
    assert_eq!(results.total_source_count(), 4);

    wait_for(&results, |r| {
        !r.any_loading()
            && r.list()[0].total_count() == 3
            && r.list()[1].total_count() == 5
            && r.failed_source_count() == 1
            && r.enabled_source_count() == 3
    })
    .await;

    assert_eq!(sorted_ids(&results), vec!["dmhy", "mikan", "acg.rip", "nyaa"]);

    let snapshot = results.snapshot();
    assert_eq!(snapshot.entries[0].total_count, 5);
    assert_eq!(snapshot.entries[2].state, MediaSourceStateKind::Failed);
    assert_eq!(snapshot.entries[3].state, MediaSourceStateKind::Disabled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn restarting_failed_source_runs_next_attempt() {
    init_tracing();
    let scope = TaskScope::current().expect("runtime");

    let flaky = ScriptedSource::start(
        "flaky",
        vec![
            vec![Step::Fail(FetchFailureKind::Timeout)],
            vec![Step::Emit(4), Step::Succeed],
        ],
    );
    let steady = ScriptedSource::start(
        "steady",
        vec![vec![Step::Emit(2), Step::Succeed]],
    );

    let results = MediaSelectorSourceResults::new(
        erase(&[flaky.clone(), steady.clone()]),
        &scope,
    );
    wait_for(&results, |r| {
        !r.any_loading()
            && r.failed_source_count() == 1
            && r.list()[1].total_count() == 2
    })
    .await;
    assert_eq!(sorted_ids(&results), vec!["steady", "flaky"]);

    assert!(results.list()[0].is_failed());
    assert_eq!(results.restart_failed(), 1);
    assert_eq!(flaky.restarts(), 1);
    assert_eq!(steady.restarts(), 0);

    wait_for(&results, |r| {
        r.failed_source_count() == 0
            && !r.any_loading()
            && r.list()[0].total_count() == 4
    })
    .await;
    assert_eq!(sorted_ids(&results), vec!["flaky", "steady"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn new_search_freezes_previous_generation() {
    init_tracing();
    let scope = TaskScope::current().expect("runtime");
    let session = MediaSelectorSession::new(
        &scope,
        PresentationOptions {
            trace_transitions: true,
        },
    );

    let slow = ScriptedSource::start(
        "slow",
        vec![vec![
            Step::Pause(Duration::from_millis(200)),
            Step::Emit(9),
            Step::Succeed,
        ]],
    );
    let first = session.replace(erase(&[slow.clone()]));
    let stale_entry = first.list()[0].clone();

    let quick = ScriptedSource::start(
        "quick",
        vec![vec![Step::Emit(1), Step::Succeed]],
    );
    let second = session.replace(erase(&[quick.clone()]));
    assert_eq!(session.generation(), 2);
    assert!(first.is_cancelled());

    wait_for(&second, |r| {
        !r.any_loading() && r.list()[0].total_count() == 1
    })
    .await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(stale_entry.is_loading());
    assert_eq!(stale_entry.total_count(), 0);

    session.close();
    assert!(session.is_closed());
    assert!(session.current().is_empty());
}
