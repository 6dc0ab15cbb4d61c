//! Scripted tour of every view, printed step by step.
//!
//!   1. Gate sends an anonymous visitor to the login view
//!   2. Login establishes the session
//!   3. Rapid typing produces a single debounced suggestion lookup
//!   4. Picking a suggestion resolves insurance options
//!   5. Insurance and NDC selection; search action navigates
//!   6. Drug details view
//!   7. Dashboard aggregates
//!   8. Logout; protected views are gated again

use medsearch_analytics::Dashboard;
use medsearch_auth::gate;
use medsearch_contracts::{error::MedSearchResult, navigation::Route};
use medsearch_core::{DrugDetails, SearchWorkflow, SubmitOutcome};

use crate::app::{print_drugs, App};

pub async fn run(app: &mut App, email: &str, password: &str) -> MedSearchResult<()> {
    println!();
    println!("MedSearch walkthrough");
    println!("=====================");
    println!();

    // ── 1-2. Login ────────────────────────────────────────────────────────────

    println!("[1] Open / without a session  → {}", gate::resolve(&app.session, "/"));
    let next = app.session.login(&app.auth, email, password).await?;
    println!("[2] Login as {}          → {}", email, gate::guard(&app.session, next));
    println!();

    // ── 3. Debounced suggestions ──────────────────────────────────────────────

    let mut wf = SearchWorkflow::new(app.catalog.clone(), &app.config.search);
    let keystrokes = ["a", "as", "asp", "aspi", "aspirin"];
    for typed in keystrokes {
        wf.input(typed);
    }
    if wf.suggestions_pending() {
        wf.settle_next().await;
    }
    println!(
        "[3] Typed {} keystrokes within {} ms; one lookup for \"{}\"",
        keystrokes.len(),
        app.config.search.debounce_ms,
        wf.session().query()
    );
    print_drugs("    Suggestions", wf.session().suggestions());
    println!();

    // ── 4. Select the suggestion ──────────────────────────────────────────────

    wf.select_suggestion(0)?;
    wf.settle_next().await;
    if let Some(e) = wf.error() {
        return Err(e.clone());
    }
    let plans: Vec<&str> = wf
        .session()
        .insurance_options()
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    println!("[4] Selected \"{}\"", wf.session().query());
    println!("    Insurance options: {}", plans.join(", "));
    println!();

    // ── 5. Insurance, NDC, navigate ───────────────────────────────────────────

    let (insurance, ndc) = match wf.session().selected_drug() {
        Some(drug) => (
            wf.session().insurance_options().first().map(|i| i.id.clone()),
            drug.ndc.first().cloned(),
        ),
        None => (None, None),
    };
    if let Some(id) = insurance {
        wf.select_insurance(&id)?;
    }
    if let Some(code) = ndc {
        wf.select_ndc(&code)?;
    }
    let request = match wf.submit().await {
        SubmitOutcome::Navigate(request) => request,
        other => {
            println!("[5] Nothing to open: {:?}", other);
            return Ok(());
        }
    };
    wf.teardown();
    println!("[5] Search action navigates to {}", request.path());
    println!();

    // ── 6. Details ────────────────────────────────────────────────────────────

    let details = DrugDetails::load(app.catalog.as_ref(), &request).await?;
    println!(
        "[6] {} | NDC {} | {} | net {}",
        details.drug.name,
        details.ndc,
        details.drug.class_name,
        details.net_price_label()
    );
    for alt in details.alternatives() {
        println!("    alternative: {} ({})", alt.name, alt.class_name);
    }
    println!();

    // ── 7. Dashboard ──────────────────────────────────────────────────────────

    let dashboard = Dashboard::load(app.catalog.as_ref()).await?;
    let a = &dashboard.analytics;
    println!(
        "[7] Dashboard: {} units over {} scripts, ${:.2} revenue, {} below net price",
        a.total_sales, a.total_scripts, a.total_revenue, a.below_net_price_count
    );
    println!();

    // ── 8. Logout ─────────────────────────────────────────────────────────────

    app.session.clear();
    println!(
        "[8] Logged out; {} now opens {}",
        Route::Dashboard,
        gate::guard(&app.session, Route::Dashboard)
    );
    println!();

    Ok(())
}
