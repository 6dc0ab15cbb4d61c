//! End-to-end flows over the built-in dataset: login, search, details,
//! dashboard.

use std::sync::Arc;

use medsearch_analytics::Dashboard;
use medsearch_auth::{gate, SessionContext, StaticAuthenticator, DEFAULT_EMAIL, DEFAULT_PASSWORD};
use medsearch_catalog::InMemoryCatalog;
use medsearch_contracts::{
    drug::{DrugId, InsuranceId},
    error::MedSearchError,
    navigation::{NavigationRequest, Route},
};
use medsearch_core::{config::SearchSettings, DrugDetails, SearchStage, SearchWorkflow, SubmitOutcome};

fn workflow() -> (Arc<InMemoryCatalog>, SearchWorkflow) {
    let catalog = Arc::new(InMemoryCatalog::with_mock_data());
    let wf = SearchWorkflow::new(catalog.clone(), &SearchSettings::default());
    (catalog, wf)
}

#[tokio::test]
async fn login_gates_the_search_view() {
    let auth = StaticAuthenticator::default();
    let mut session = SessionContext::new();
    assert_eq!(gate::guard(&session, Route::Search), Route::Login);

    let err = session.login(&auth, DEFAULT_EMAIL, "wrong").await.unwrap_err();
    assert_eq!(err, MedSearchError::InvalidCredentials);
    assert_eq!(gate::resolve(&session, "/"), Route::Login);

    let next = session.login(&auth, DEFAULT_EMAIL, DEFAULT_PASSWORD).await.unwrap();
    assert_eq!(gate::guard(&session, next), Route::Search);
    assert_eq!(gate::resolve(&session, "/dashboard"), Route::Dashboard);

    session.clear();
    assert_eq!(gate::resolve(&session, "/dashboard"), Route::Login);
}

#[tokio::test(start_paused = true)]
async fn aspirin_from_suggestion_to_details() {
    let (catalog, mut wf) = workflow();

    wf.input("aspirin");
    assert!(wf.settle_next().await);
    let suggested: Vec<&str> = wf.session().suggestions().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(suggested, ["Aspirin 81mg"]);

    wf.select_suggestion(0).unwrap();
    assert!(wf.settle_next().await);
    let plans: Vec<&str> = wf.session().insurance_options().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(plans, ["Medicare", "Medicaid", "BlueCross"]);

    wf.select_insurance(&InsuranceId::new("1")).unwrap();
    wf.select_ndc("00000-0001-01").unwrap();
    assert_eq!(wf.session().stage(), SearchStage::ReadyToNavigate);

    let request = match wf.submit().await {
        SubmitOutcome::Navigate(request) => request,
        other => panic!("expected navigation, got {other:?}"),
    };
    assert_eq!(request.path(), "/drug/1?ndc=00000-0001-01");
    wf.teardown();

    let details = DrugDetails::load(catalog.as_ref(), &request).await.unwrap();
    assert_eq!(details.drug.class_name, "NSAID");
    assert!(details.ndc_listed);
    assert_eq!(details.net_price_label(), "$4.50");
    assert!(!details.alternatives().is_empty());
}

#[tokio::test(start_paused = true)]
async fn explicit_search_then_wrong_ndc() {
    let (_, mut wf) = workflow();

    wf.input("inhibitor");
    assert_eq!(wf.submit().await, SubmitOutcome::Searched { count: 3 });
    assert_eq!(wf.session().results()[0].name, "Lisinopril 10mg");
    assert!(!wf.session().suggestions_visible());

    wf.select_result(0).unwrap();
    assert!(wf.settle_next().await);
    let err = wf.select_ndc("00000-0001-01").unwrap_err();
    assert!(matches!(err, MedSearchError::InvalidSelection { .. }));
    assert!(wf.session().selected_ndc().is_none());
    assert!(wf.error().is_some());

    wf.select_ndc("00000-0004-02").unwrap();
    assert!(wf.error().is_none());
}

#[tokio::test]
async fn unknown_drug_details_is_not_found() {
    let catalog = InMemoryCatalog::with_mock_data();
    let request = NavigationRequest {
        drug_id: DrugId::new("404"),
        ndc: "00000-0001-01".to_string(),
    };
    let err = DrugDetails::load(&catalog, &request).await.unwrap_err();
    assert_eq!(err, MedSearchError::drug_not_found("404"));
}

#[tokio::test]
async fn dashboard_over_mock_sales() {
    let catalog = InMemoryCatalog::with_mock_data();
    let dashboard = Dashboard::load(&catalog).await.unwrap();
    let a = &dashboard.analytics;

    assert_eq!(a.total_scripts, 8);
    assert_eq!(a.total_sales, 534);
    assert!((a.total_revenue - 2577.0).abs() < 1e-6);
    assert_eq!(a.below_net_price_count, 3);

    let alerts: Vec<&str> = dashboard.alerts.iter().map(|s| s.sale_id.as_str()).collect();
    assert_eq!(alerts, ["s-002", "s-003", "s-006"]);

    let by_drug: Vec<(&str, u64)> = a
        .sales_by_drug
        .iter()
        .map(|d| (d.drug_name.as_str(), d.scripts))
        .collect();
    assert_eq!(
        by_drug,
        [
            ("Aspirin 81mg", 2),
            ("Lisinopril 10mg", 1),
            ("Atorvastatin 20mg", 2),
            ("Metformin 500mg", 1),
            ("Ibuprofen 200mg", 1),
            ("Losartan 50mg", 1),
        ]
    );
}
