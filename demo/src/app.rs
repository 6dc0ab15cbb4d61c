//! Subcommand implementations.

use std::{path::PathBuf, sync::Arc};

use serde::Serialize;

use medsearch_analytics::{Dashboard, UploadInbox};
use medsearch_auth::{gate, SessionContext, StaticAuthenticator};
use medsearch_catalog::InMemoryCatalog;
use medsearch_contracts::{
    drug::{Drug, DrugId, InsuranceId},
    error::{MedSearchError, MedSearchResult},
    navigation::{NavigationRequest, Route},
};
use medsearch_core::{DrugDetails, MedSearchConfig, SearchWorkflow, SubmitOutcome};

use crate::{walkthrough, Cli, Command};

pub struct App {
    pub config: MedSearchConfig,
    pub catalog: Arc<InMemoryCatalog>,
    pub auth: StaticAuthenticator,
    pub session: SessionContext,
    json: bool,
}

impl App {
    pub fn open(cli: &Cli) -> MedSearchResult<Self> {
        let config = MedSearchConfig::load(cli.config.as_deref())?;
        let catalog = Arc::new(InMemoryCatalog::from_settings(&config.catalog)?);
        let auth = StaticAuthenticator::from_settings(&config.auth);
        Ok(Self {
            config,
            catalog,
            auth,
            session: SessionContext::new(),
            json: cli.json,
        })
    }

    pub async fn run(&mut self, cli: &Cli) -> MedSearchResult<()> {
        match &cli.command {
            Command::Login => self.login(cli).await,
            Command::Search {
                query,
                select,
                insurance,
                ndc,
            } => {
                self.enter(cli, Route::Search).await?;
                self.search(query, *select, insurance.as_deref(), ndc.as_deref()).await
            }
            Command::Suggest { query } => {
                self.enter(cli, Route::Search).await?;
                self.suggest(query).await
            }
            Command::Details { drug_id, ndc } => {
                let request = NavigationRequest {
                    drug_id: DrugId::new(drug_id.as_str()),
                    ndc: ndc.clone(),
                };
                self.enter(cli, request.route()).await?;
                self.details(&request).await
            }
            Command::Dashboard => {
                self.enter(cli, Route::Dashboard).await?;
                self.dashboard().await
            }
            Command::Upload { files } => {
                self.enter(cli, Route::Upload).await?;
                self.upload(files)
            }
            Command::Walkthrough => walkthrough::run(self, &cli.email, &cli.password).await,
        }
    }

    /// Log in and check the gate lets `route` through.
    async fn enter(&mut self, cli: &Cli, route: Route) -> MedSearchResult<()> {
        self.session.login(&self.auth, &cli.email, &cli.password).await?;
        let shown = gate::guard(&self.session, route.clone());
        if shown != route {
            return Err(MedSearchError::InvalidCredentials);
        }
        Ok(())
    }

    fn emit<T: Serialize>(&self, value: &T) -> MedSearchResult<bool> {
        if !self.json {
            return Ok(false);
        }
        let text = serde_json::to_string_pretty(value).map_err(|e| MedSearchError::ConfigError {
            reason: format!("failed to render JSON: {}", e),
        })?;
        println!("{}", text);
        Ok(true)
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    async fn login(&mut self, cli: &Cli) -> MedSearchResult<()> {
        let next = self.session.login(&self.auth, &cli.email, &cli.password).await?;
        let next = gate::guard(&self.session, next);

        #[derive(Serialize)]
        struct LoginView<'a> {
            email: &'a str,
            token: &'a str,
            next: String,
        }
        let view = LoginView {
            email: self.session.email().unwrap_or_default(),
            token: self.session.token().map(|t| t.as_str()).unwrap_or_default(),
            next: next.path(),
        };
        if !self.emit(&view)? {
            println!("Logged in as {}", view.email);
            println!("  Session token: {}…", &view.token[..view.token.len().min(12)]);
            println!("  Next view:     {}", view.next);
        }
        Ok(())
    }

    async fn search(
        &mut self,
        query: &str,
        select: Option<usize>,
        insurance: Option<&str>,
        ndc: Option<&str>,
    ) -> MedSearchResult<()> {
        let mut wf = SearchWorkflow::new(self.catalog.clone(), &self.config.search);
        wf.input(query);

        let outcome = wf.submit().await;
        if let SubmitOutcome::Failed(e) = outcome {
            return Err(e);
        }

        let Some(index) = select else {
            wf.teardown();
            if !self.emit(&wf.session().results())? {
                print_drugs(&format!("Results for \"{}\"", query), wf.session().results());
            }
            return Ok(());
        };

        let navigation = select_result(&mut wf, index, insurance, ndc).await?;
        wf.teardown();

        if self.emit(&wf.session())? {
            return Ok(());
        }
        let session = wf.session();
        if let Some(drug) = session.selected_drug() {
            println!("Selected: {} ({})", drug.name, drug.class_name);
            println!("  NDC codes: {}", drug.ndc.join(", "));
        }
        let plans: Vec<String> = session
            .insurance_options()
            .iter()
            .map(|i| format!("{}={}", i.id, i.name))
            .collect();
        println!("  Insurance: {}", plans.join(", "));
        if let Some(plan) = session.selected_insurance() {
            println!("  Insurance selected: {}", plan.name);
        }
        match navigation {
            Some(request) => println!("  Navigate to: {}", request.path()),
            None => println!("  Select an NDC with --ndc to open the details view."),
        }
        Ok(())
    }

    async fn suggest(&mut self, query: &str) -> MedSearchResult<()> {
        let mut wf = SearchWorkflow::new(self.catalog.clone(), &self.config.search);
        wf.input(query);
        if wf.suggestions_pending() {
            wf.settle_next().await;
        }
        wf.teardown();
        if let Some(e) = wf.error() {
            return Err(e.clone());
        }

        if !self.emit(&wf.session().suggestions())? {
            if query.chars().count() < self.config.search.min_query_chars {
                println!(
                    "Type at least {} characters for suggestions.",
                    self.config.search.min_query_chars
                );
            } else {
                print_drugs(&format!("Suggestions for \"{}\"", query), wf.session().suggestions());
            }
        }
        Ok(())
    }

    async fn details(&mut self, request: &NavigationRequest) -> MedSearchResult<()> {
        let details = DrugDetails::load(self.catalog.as_ref(), request).await?;
        if self.emit(&details)? {
            return Ok(());
        }
        let drug = &details.drug;
        println!("{}", drug.name);
        println!("  NDC:        {}{}", details.ndc, if details.ndc_listed { "" } else { " (not listed)" });
        println!("  Class:      {}", drug.class_name);
        println!("  Net price:  {}", details.net_price_label());
        println!("  {}", drug.description);
        if !details.alternatives().is_empty() {
            println!("  Alternatives:");
            for alt in details.alternatives() {
                println!("    - {} ({})", alt.name, alt.class_name);
            }
        }
        Ok(())
    }

    async fn dashboard(&mut self) -> MedSearchResult<()> {
        let dashboard = Dashboard::load(self.catalog.as_ref()).await?;
        if self.emit(&dashboard)? {
            return Ok(());
        }
        let a = &dashboard.analytics;
        println!("Pharmacy sales");
        println!("  Total sales:    {}", a.total_sales);
        println!("  Total scripts:  {}", a.total_scripts);
        println!("  Total revenue:  ${:.2}", a.total_revenue);
        println!("  Below net:      {}", a.below_net_price_count);
        println!();
        println!("Below net price");
        for s in &dashboard.alerts {
            println!(
                "  {:<22} {:<20} ${:>7.2} < ${:>7.2}  (-${:.2})",
                s.pharmacy_name, s.drug_name, s.sale_price, s.net_price, s.difference
            );
        }
        println!();
        println!("Sales by drug");
        for d in &a.sales_by_drug {
            println!("  {:<20} {:>3} scripts  ${:>9.2}", d.drug_name, d.scripts, d.revenue);
        }
        Ok(())
    }

    fn upload(&mut self, files: &[PathBuf]) -> MedSearchResult<()> {
        let inbox = UploadInbox::new(self.config.upload.clone());
        for path in files {
            inbox.accept_file(path)?;
        }
        let receipts = inbox.receipts()?;
        if !self.emit(&receipts)? {
            for r in &receipts {
                println!("Uploaded {} ({} bytes)", r.file_name, r.size_bytes);
                println!("  id:     {}", r.upload_id.0);
                println!("  sha256: {}", r.sha256);
            }
        }
        Ok(())
    }
}

/// Select the committed result at `index`, wait for its insurance options,
/// then apply the optional insurance and NDC choices.
///
/// The search action only runs once a drug and an NDC are both selected;
/// without an NDC it would search again and drop the selection.
pub async fn select_result(
    wf: &mut SearchWorkflow,
    index: usize,
    insurance: Option<&str>,
    ndc: Option<&str>,
) -> MedSearchResult<Option<NavigationRequest>> {
    wf.select_result(index)?;
    wf.settle_next().await;
    if let Some(e) = wf.error() {
        return Err(e.clone());
    }
    if let Some(id) = insurance {
        wf.select_insurance(&InsuranceId::new(id))?;
    }
    if let Some(code) = ndc {
        wf.select_ndc(code)?;
    }

    if wf.session().navigation_target().is_none() {
        return Ok(None);
    }
    match wf.submit().await {
        SubmitOutcome::Navigate(request) => Ok(Some(request)),
        SubmitOutcome::Failed(e) => Err(e),
        _ => Ok(None),
    }
}

pub fn print_drugs(title: &str, drugs: &[Drug]) {
    println!("{} ({} found)", title, drugs.len());
    for (i, drug) in drugs.iter().enumerate() {
        println!(
            "  [{}] {:<20} {:<32} {}",
            i,
            drug.name,
            drug.class_name,
            drug.ndc.join(", ")
        );
    }
}
