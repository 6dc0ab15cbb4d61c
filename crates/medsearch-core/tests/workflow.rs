mod support;

use std::{
    sync::{atomic::Ordering, Arc},
    time::Duration,
};

use medsearch_contracts::{
    drug::{DrugId, InsuranceId},
    error::MedSearchError,
    navigation::NavigationRequest,
};
use medsearch_core::{
    config::SearchSettings,
    event::LookupEvent,
    DrugDetails, SearchStage, SearchWorkflow, SubmitOutcome,
};

use support::StubCatalog;

fn workflow(catalog: &Arc<StubCatalog>) -> SearchWorkflow {
    SearchWorkflow::new(catalog.clone(), &SearchSettings::default())
}

/// Search "nsaid" and select the first result, with insurance resolved.
async fn with_aspirin_selected(catalog: &Arc<StubCatalog>) -> SearchWorkflow {
    let mut wf = workflow(catalog);
    wf.input("nsaid");
    assert_eq!(wf.submit().await, SubmitOutcome::Searched { count: 2 });
    wf.select_result(0).unwrap();
    assert!(wf.settle_next().await);
    wf
}

#[tokio::test(start_paused = true)]
async fn full_flow_ends_in_a_navigation_request() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    wf.input("aspirin");
    assert!(wf.settle_next().await);
    assert_eq!(wf.session().suggestions().len(), 1);

    wf.select_suggestion(0).unwrap();
    assert_eq!(wf.session().query(), "Aspirin 81mg");
    assert!(!wf.session().suggestions_visible());
    assert_eq!(wf.session().stage(), SearchStage::AwaitingNdc);

    assert!(wf.settle_next().await);
    let plans: Vec<&str> = wf.session().insurance_options().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(plans, ["Medicare", "Medicaid", "BlueCross"]);
    assert!(wf.session().selected_ndc().is_none());

    wf.select_insurance(&InsuranceId::new("3")).unwrap();
    wf.select_ndc("00000-0001-01").unwrap();
    assert_eq!(wf.session().stage(), SearchStage::ReadyToNavigate);

    let outcome = wf.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Navigate(NavigationRequest {
            drug_id: DrugId::new("1"),
            ndc: "00000-0001-01".to_string(),
        })
    );
    // Navigating is not a search.
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 0);

    // Prefilling the query from the suggestion never triggered another lookup.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(catalog.suggest_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn selecting_a_drug_clears_insurance_and_ndc_before_new_options_arrive() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = with_aspirin_selected(&catalog).await;
    wf.select_insurance(&InsuranceId::new("1")).unwrap();
    wf.select_ndc("00000-0001-01").unwrap();

    wf.select_result(1).unwrap();

    // Nothing has been awaited yet: the old selection is already gone.
    assert_eq!(wf.session().selected_drug().unwrap().id, DrugId::new("2"));
    assert!(wf.session().selected_insurance().is_none());
    assert!(wf.session().selected_ndc().is_none());
    assert!(wf.session().insurance_options().is_empty());
    assert!(wf.session().navigation_target().is_none());

    assert!(wf.settle_next().await);
    assert_eq!(wf.session().insurance_options().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn search_action_without_ndc_searches_again() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = with_aspirin_selected(&catalog).await;

    // Drug selected but no NDC: the same action runs a fresh search.
    wf.input("statin");
    assert_eq!(wf.submit().await, SubmitOutcome::Searched { count: 1 });
    assert!(wf.session().selected_drug().is_none());
    assert!(wf.session().insurance_options().is_empty());
    assert_eq!(wf.session().stage(), SearchStage::ResultsShown);
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn explicit_search_hides_and_supersedes_pending_suggestions() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    wf.input("ibu");
    assert_eq!(wf.submit().await, SubmitOutcome::Searched { count: 1 });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(wf.drain_events(), 0);
    assert_eq!(catalog.suggest_calls(), 0);
    assert!(!wf.session().suggestions_visible());
}

#[tokio::test(start_paused = true)]
async fn invalid_ndc_is_rejected_and_never_stored() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = with_aspirin_selected(&catalog).await;

    let err = wf.select_ndc("00000-0002-01").unwrap_err();
    assert!(matches!(err, MedSearchError::InvalidSelection { .. }));
    assert!(wf.session().selected_ndc().is_none());
    assert_eq!(wf.error(), Some(&err));

    // Still not ready: the action searches instead of navigating.
    assert!(matches!(wf.submit().await, SubmitOutcome::Searched { .. }));
}

#[tokio::test(start_paused = true)]
async fn out_of_range_selection_is_an_error() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);

    assert!(wf.select_suggestion(0).is_err());
    assert!(wf.select_result(5).is_err());
    assert!(wf.select_insurance(&InsuranceId::new("1")).is_err());
    assert!(wf.session().selected_drug().is_none());
}

#[tokio::test(start_paused = true)]
async fn insurance_failure_clears_options_and_keeps_the_drug() {
    let catalog = Arc::new(StubCatalog::new());
    catalog.fail_insurance.store(true, Ordering::SeqCst);
    let mut wf = with_aspirin_selected(&catalog).await;

    assert!(wf.session().insurance_options().is_empty());
    assert_eq!(wf.session().selected_drug().unwrap().id, DrugId::new("1"));
    match wf.error() {
        Some(MedSearchError::LookupFailure { reason }) => {
            assert!(reason.contains("insurance options for drug '1'"));
        }
        other => panic!("expected LookupFailure, got {:?}", other),
    }

    // The NDC can still be chosen and the flow completed.
    wf.select_ndc("00000-0001-01").unwrap();
    assert!(wf.error().is_none());
    assert!(matches!(wf.submit().await, SubmitOutcome::Navigate(_)));
}

#[tokio::test(start_paused = true)]
async fn search_failure_clears_results_only() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = with_aspirin_selected(&catalog).await;

    catalog.fail_search.store(true, Ordering::SeqCst);
    let outcome = wf.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(MedSearchError::LookupFailure { .. })));
    assert!(wf.session().results().is_empty());
    assert_eq!(wf.session().selected_drug().unwrap().id, DrugId::new("1"));
    assert_eq!(wf.session().insurance_options().len(), 3);
    assert!(wf.error().is_some());
}

#[tokio::test(start_paused = true)]
async fn rapid_reselection_applies_only_the_latest_insurance_lookup() {
    let catalog = Arc::new(StubCatalog::new());
    catalog.set_delay(Duration::from_millis(200));
    let mut wf = workflow(&catalog);
    wf.input("nsaid");
    wf.submit().await;

    wf.select_result(0).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    wf.select_result(1).unwrap();

    assert!(wf.settle_next().await);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(wf.drain_events(), 0);
    assert_eq!(wf.session().selected_drug().unwrap().id, DrugId::new("2"));
    assert_eq!(wf.session().insurance_options().len(), 3);

    // A response for a superseded selection is never applied.
    let stale = LookupEvent::InsuranceOptions {
        seq: 0,
        drug_id: DrugId::new("1"),
        result: Ok(vec![]),
    };
    assert!(!wf.apply(stale));
    assert_eq!(wf.session().insurance_options().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn teardown_drops_in_flight_insurance_lookup() {
    let catalog = Arc::new(StubCatalog::new());
    catalog.set_delay(Duration::from_millis(200));
    let mut wf = workflow(&catalog);
    wf.input("nsaid");
    wf.submit().await;
    wf.select_result(0).unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(catalog.insurance_calls(), 1);
    wf.teardown();
    assert!(wf.is_torn_down());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(wf.drain_events(), 0);
    assert!(wf.session().insurance_options().is_empty());
}

#[tokio::test(start_paused = true)]
async fn selecting_a_result_cancels_pending_suggestions() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = workflow(&catalog);
    wf.input("nsaid");
    assert_eq!(wf.submit().await, SubmitOutcome::Searched { count: 2 });

    // Typing again arms a lookup; picking a result before it fires drops it.
    wf.input("asp");
    assert!(wf.suggestions_pending());
    wf.select_result(0).unwrap();
    assert!(!wf.suggestions_pending());
    assert!(wf.settle_next().await);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(wf.drain_events(), 0);
    assert_eq!(catalog.suggest_calls(), 0);
    assert!(!wf.session().suggestions_visible());
    assert_eq!(wf.session().insurance_options().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn submit_after_teardown_does_nothing() {
    let catalog = Arc::new(StubCatalog::new());
    let mut wf = with_aspirin_selected(&catalog).await;
    wf.select_ndc("00000-0001-01").unwrap();
    wf.teardown();

    assert_eq!(wf.submit().await, SubmitOutcome::Closed);
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 1);
    assert_eq!(wf.session().selected_ndc(), Some("00000-0001-01"));
    assert_eq!(wf.session().results().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn details_load_for_navigation_request() {
    let catalog = Arc::new(StubCatalog::new());
    let request = NavigationRequest {
        drug_id: DrugId::new("2"),
        ndc: "00000-0002-02".to_string(),
    };

    let details = DrugDetails::load(catalog.as_ref(), &request).await.unwrap();
    assert_eq!(details.drug.name, "Ibuprofen 200mg");
    assert!(details.ndc_listed);
    assert_eq!(details.net_price_label(), "$2.50");

    let unlisted = NavigationRequest {
        ndc: "11111-1111-11".to_string(),
        ..request.clone()
    };
    assert!(!DrugDetails::load(catalog.as_ref(), &unlisted).await.unwrap().ndc_listed);

    let unknown = NavigationRequest {
        drug_id: DrugId::new("404"),
        ..request
    };
    let err = DrugDetails::load(catalog.as_ref(), &unknown).await.unwrap_err();
    assert!(matches!(err, MedSearchError::NotFound { .. }));
}
