mod support;

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;

use medsearch_contracts::error::MedSearchError;
use medsearch_core::{
    config::SearchSettings,
    debounce::{Debounced, SuggestionDebouncer},
    event::{lookup_channel, LookupEvent},
    SearchWorkflow,
};

use support::StubCatalog;

fn workflow(catalog: &Arc<StubCatalog>) -> SearchWorkflow {
    SearchWorkflow::new(catalog.clone(), &SearchSettings::default())
}

#[tokio::test(start_paused = true)]
async fn short_queries_never_issue_a_lookup() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    for q in ["", "a", "A", "é"] {
        wf.input(q);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    assert_eq!(wf.drain_events(), 0);
    assert_eq!(catalog.suggest_calls(), 0);
    assert!(wf.session().suggestions().is_empty());
    assert!(!wf.session().suggestions_visible());
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_call_within_the_quiet_period_executes() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    wf.input("as");
    tokio::time::sleep(Duration::from_millis(100)).await;
    wf.input("asp");

    assert!(wf.settle_next().await);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(wf.drain_events(), 0);

    assert_eq!(catalog.suggest_calls(), 1);
    assert_eq!(*catalog.suggest_queries.lock().unwrap(), vec!["asp".to_string()]);
    let names: Vec<&str> = wf.session().suggestions().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Aspirin 81mg"]);
}

#[tokio::test(start_paused = true)]
async fn lookup_waits_for_the_full_quiet_period() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    let started = Instant::now();
    wf.input("aspirin");
    assert!(wf.suggestions_pending());

    assert!(wf.settle_next().await);
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(wf.session().suggestions_visible());
    assert_eq!(wf.session().suggestions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn shrinking_the_query_cancels_the_pending_lookup() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    wf.input("asp");
    assert!(wf.settle_next().await);
    assert!(wf.session().suggestions_visible());

    wf.input("aspi");
    tokio::time::sleep(Duration::from_millis(100)).await;
    wf.input("a");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(wf.drain_events(), 0);
    assert_eq!(catalog.suggest_calls(), 1);
    assert!(wf.session().suggestions().is_empty());
    assert!(!wf.session().suggestions_visible());
}

#[tokio::test(start_paused = true)]
async fn ndc_fragments_match_suggestions_but_not_search() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    wf.input("0002-02");
    assert!(wf.settle_next().await);
    let ids: Vec<&str> = wf.session().suggestions().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["2"]);

    assert_eq!(
        wf.submit().await,
        medsearch_core::SubmitOutcome::Searched { count: 0 }
    );
}

#[tokio::test(start_paused = true)]
async fn failed_suggestion_lookup_is_reported_not_fatal() {
    let catalog = Arc::new(StubCatalog::new());
    catalog.fail_suggest.store(true, std::sync::atomic::Ordering::SeqCst);
    let mut wf = workflow(&catalog);

    wf.input("asp");
    assert!(wf.settle_next().await);

    assert!(matches!(wf.error(), Some(MedSearchError::LookupFailure { .. })));
    assert!(wf.session().suggestions().is_empty());
    assert_eq!(wf.session().query(), "asp");
}

#[tokio::test(start_paused = true)]
async fn stale_and_post_teardown_results_are_discarded() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    wf.input("asp");
    let stale = LookupEvent::Suggestions {
        seq: 0,
        query: "as".to_string(),
        result: Ok(catalog.drugs.clone()),
    };
    assert!(!wf.apply(stale));
    assert!(wf.session().suggestions().is_empty());

    wf.teardown();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(catalog.suggest_calls(), 0, "teardown cancels the pending timer");

    let late = LookupEvent::Suggestions {
        seq: u64::MAX,
        query: "asp".to_string(),
        result: Ok(catalog.drugs.clone()),
    };
    assert!(!wf.apply(late));
    assert!(wf.session().suggestions().is_empty());

    // Input after teardown is ignored.
    wf.input("aspirin");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(catalog.suggest_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn in_flight_lookup_is_dropped_on_teardown() {
    let catalog = Arc::new(StubCatalog::new());
    catalog.set_delay(Duration::from_millis(500));
    let mut wf = workflow(&catalog);

    wf.input("asp");
    // Quiet period over, lookup now stalled in the backend.
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(catalog.suggest_calls(), 1);

    wf.teardown();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(wf.drain_events(), 0);
    assert!(wf.session().suggestions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn debouncer_tags_each_call_with_a_new_sequence() {
    let catalog = Arc::new(StubCatalog::new());
    let (tx, mut rx) = lookup_channel();
    let mut debouncer = SuggestionDebouncer::new(catalog.clone(), tx, &SearchSettings::default());

    assert_eq!(debouncer.on_query_change("a"), Debounced::Cleared { seq: 1 });
    assert_eq!(debouncer.on_query_change("at"), Debounced::Scheduled { seq: 2 });
    assert_eq!(debouncer.on_query_change("ato"), Debounced::Scheduled { seq: 3 });

    let event = rx.recv().await.unwrap();
    assert_eq!(event.seq(), 3);
    match event {
        LookupEvent::Suggestions { query, result, .. } => {
            assert_eq!(query, "ato");
            assert_eq!(result.unwrap()[0].name, "Atorvastatin 20mg");
        }
        other => panic!("expected suggestions, got {:?}", other),
    }

    assert_eq!(debouncer.cancel(), 4);
    assert_eq!(debouncer.latest_seq(), 4);
}

#[tokio::test(start_paused = true)]
async fn custom_quiet_period_and_minimum_are_honoured() {
    let catalog = Arc::new(StubCatalog::new());
    let settings = SearchSettings {
        debounce_ms: 50,
        min_query_chars: 4,
    };
    let mut wf = SearchWorkflow::new(catalog.clone(), &settings);

    wf.input("asp");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(catalog.suggest_calls(), 0);

    let started = Instant::now();
    wf.input("aspi");
    assert!(wf.settle_next().await);
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(50) && waited < Duration::from_millis(300));
}
