//! The search workflow controller.
//!
//! `SearchWorkflow` is the single writer of a `SearchSession`. It feeds query
//! input to the `SuggestionDebouncer`, runs explicit searches, dispatches
//! insurance lookups through the `SelectionResolver`, and applies lookup
//! results as they arrive:
//!
//!   input → debounce → suggestions → select drug → insurance → select NDC → navigate
//!
//! Lookup failures never escape: they clear the field being fetched and
//! leave a message in `error()`. Results tagged with a sequence number that
//! is no longer the latest, or that arrive after `teardown()`, are discarded.

use std::sync::Arc;

use tracing::{debug, info, warn};

use medsearch_contracts::{
    drug::{Drug, InsuranceId},
    error::{MedSearchError, MedSearchResult},
    navigation::NavigationRequest,
};

use crate::{
    config::SearchSettings,
    debounce::{Debounced, SuggestionDebouncer},
    event::{lookup_channel, LookupEvent, LookupReceiver},
    resolver::SelectionResolver,
    state::SearchSession,
    traits::DrugCatalog,
};

/// What the search action did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Drug and NDC were both selected: open the details view.
    Navigate(NavigationRequest),
    /// A catalog search replaced the committed results.
    Searched { count: usize },
    /// The search failed; results were cleared and `error()` is set.
    Failed(MedSearchError),
    /// The workflow was torn down; nothing was searched or changed.
    Closed,
}

pub struct SearchWorkflow {
    catalog: Arc<dyn DrugCatalog>,
    session: SearchSession,
    debouncer: SuggestionDebouncer,
    resolver: SelectionResolver,
    events: LookupReceiver,
    suggestion_seq: u64,
    insurance_seq: u64,
    error: Option<MedSearchError>,
    torn_down: bool,
}

impl SearchWorkflow {
    pub fn new(catalog: Arc<dyn DrugCatalog>, settings: &SearchSettings) -> Self {
        let (tx, rx) = lookup_channel();
        Self {
            debouncer: SuggestionDebouncer::new(Arc::clone(&catalog), tx.clone(), settings),
            resolver: SelectionResolver::new(Arc::clone(&catalog), tx),
            catalog,
            session: SearchSession::new(),
            events: rx,
            suggestion_seq: 0,
            insurance_seq: 0,
            error: None,
            torn_down: false,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// The last lookup or selection failure, until the next successful action.
    pub fn error(&self) -> Option<&MedSearchError> {
        self.error.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// True while a suggestion lookup is waiting for its quiet period.
    pub fn suggestions_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    // ── User actions ─────────────────────────────────────────────────────────

    /// The query input changed. Committed results are left untouched.
    pub fn input(&mut self, query: impl Into<String>) {
        if self.torn_down {
            return;
        }
        let query = query.into();
        let outcome = self.debouncer.on_query_change(&query);
        self.session.set_query(query);
        if let Debounced::Cleared { .. } = outcome {
            self.session.clear_suggestions();
        }
        self.suggestion_seq = outcome.seq();
    }

    /// The search button: navigates when a drug and an NDC are selected,
    /// searches the catalog otherwise.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.torn_down {
            debug!("workflow torn down, submit ignored");
            return SubmitOutcome::Closed;
        }
        if let Some(request) = self.session.navigation_target() {
            info!(path = %request.path(), "navigation requested");
            return SubmitOutcome::Navigate(request);
        }

        // An explicit search supersedes any pending suggestion lookup.
        self.suggestion_seq = self.debouncer.cancel();
        self.session.hide_suggestions();

        let query = self.session.query().to_string();
        debug!(query = %query, "explicit search");

        match self.catalog.search_drugs(&query).await {
            Ok(drugs) => {
                self.insurance_seq = self.resolver.cancel();
                let count = drugs.len();
                self.session.commit_results(drugs);
                self.error = None;
                info!(query = %query, count, "search results committed");
                SubmitOutcome::Searched { count }
            }
            Err(e) => {
                let e = e.into_lookup_failure("search");
                warn!(query = %query, error = %e, "search failed");
                self.session.clear_results();
                self.error = Some(e.clone());
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Pick the suggestion at `index`; its name becomes the query.
    pub fn select_suggestion(&mut self, index: usize) -> MedSearchResult<()> {
        let drug = self
            .session
            .suggestions()
            .get(index)
            .cloned()
            .ok_or_else(|| MedSearchError::InvalidSelection {
                reason: format!("no suggestion at position {}", index),
            })?;
        // Pre-filling the query must not trigger another lookup.
        self.session.set_query(drug.name.clone());
        self.select_drug(drug);
        Ok(())
    }

    /// Pick the committed result at `index`.
    pub fn select_result(&mut self, index: usize) -> MedSearchResult<()> {
        let drug = self
            .session
            .results()
            .get(index)
            .cloned()
            .ok_or_else(|| MedSearchError::InvalidSelection {
                reason: format!("no result at position {}", index),
            })?;
        self.select_drug(drug);
        Ok(())
    }

    /// Select `drug` and start resolving its insurance options.
    ///
    /// The previous insurance and NDC selection is cleared before the lookup
    /// is even dispatched. A suggestion lookup still waiting for its quiet
    /// period is canceled so the panel stays hidden.
    pub fn select_drug(&mut self, drug: Drug) {
        if self.torn_down {
            return;
        }
        self.suggestion_seq = self.debouncer.cancel();
        info!(drug_id = %drug.id, name = %drug.name, "drug selected");
        self.session.select_drug(drug);
        if let Some(selected) = self.session.selected_drug() {
            self.insurance_seq = self.resolver.dispatch(selected);
        }
        self.error = None;
    }

    pub fn select_insurance(&mut self, id: &InsuranceId) -> MedSearchResult<()> {
        self.record(|session| session.select_insurance(id))
    }

    pub fn clear_insurance(&mut self) {
        self.session.clear_insurance_selection();
    }

    /// Select an NDC of the selected drug. Invalid codes are rejected and the
    /// previous selection stays.
    pub fn select_ndc(&mut self, ndc: &str) -> MedSearchResult<()> {
        self.record(|session| session.select_ndc(ndc))
    }

    fn record(
        &mut self,
        change: impl FnOnce(&mut SearchSession) -> MedSearchResult<()>,
    ) -> MedSearchResult<()> {
        match change(&mut self.session) {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "selection rejected");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    // ── Lookup results ───────────────────────────────────────────────────────

    /// Apply one lookup result. Returns false when it was stale and discarded.
    pub fn apply(&mut self, event: LookupEvent) -> bool {
        if self.torn_down {
            debug!(seq = event.seq(), "workflow torn down, lookup result discarded");
            return false;
        }

        match event {
            LookupEvent::Suggestions { seq, query, result } => {
                if seq != self.suggestion_seq {
                    debug!(seq, latest = self.suggestion_seq, query = %query, "stale suggestions discarded");
                    return false;
                }
                match result {
                    Ok(drugs) => {
                        debug!(seq, query = %query, count = drugs.len(), "suggestions shown");
                        self.session.show_suggestions(drugs);
                    }
                    Err(e) => {
                        warn!(query = %query, error = %e, "suggestion lookup failed");
                        self.session.clear_suggestions();
                        self.error = Some(e);
                    }
                }
                true
            }
            LookupEvent::InsuranceOptions { seq, drug_id, result } => {
                if seq != self.insurance_seq {
                    debug!(seq, latest = self.insurance_seq, drug_id = %drug_id, "stale insurance options discarded");
                    return false;
                }
                match result {
                    Ok(options) => self.session.set_insurance_options(&drug_id, options),
                    Err(e) => {
                        self.session.clear_insurance_options();
                        self.error = Some(e);
                        true
                    }
                }
            }
        }
    }

    /// Apply every result that has already arrived. Returns how many were
    /// applied (stale ones are not counted).
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next lookup result and apply it.
    ///
    /// Returns false if it was stale or the workflow is closed. Only await
    /// this when a lookup is known to be outstanding.
    pub async fn settle_next(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Leave the view: cancel pending work and ignore anything still in flight.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.debouncer.cancel();
        self.resolver.cancel();
        self.events.close();
        self.torn_down = true;
        debug!("search workflow torn down");
    }
}
