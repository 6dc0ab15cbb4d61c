//! The search session state record.
//!
//! `SearchSession` owns every field the search view displays. Fields are
//! private; the setters enforce the session invariants:
//!
//! - selecting a drug clears the insurance options, the selected insurance
//!   and the selected NDC in the same call;
//! - the selected NDC is always one of the selected drug's NDCs;
//! - the selected insurance is always one of the offered options;
//! - a navigation target exists only when a drug and an NDC are selected.

use serde::Serialize;

use medsearch_contracts::{
    drug::{Drug, DrugId, Insurance, InsuranceId},
    error::{MedSearchError, MedSearchResult},
    navigation::NavigationRequest,
};

/// Where the user is in the search flow. Derived from the fields, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStage {
    /// Typing; maybe showing live suggestions.
    Typing,
    /// Committed results shown, nothing selected.
    ResultsShown,
    /// A drug is selected but no NDC yet.
    AwaitingNdc,
    /// Drug and NDC selected; the search action now navigates.
    ReadyToNavigate,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchSession {
    query: String,
    suggestions: Vec<Drug>,
    suggestions_visible: bool,
    results: Vec<Drug>,
    selected_drug: Option<Drug>,
    insurance_options: Vec<Insurance>,
    selected_insurance: Option<Insurance>,
    selected_ndc: Option<String>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Drug] {
        &self.suggestions
    }

    pub fn suggestions_visible(&self) -> bool {
        self.suggestions_visible
    }

    pub fn results(&self) -> &[Drug] {
        &self.results
    }

    pub fn selected_drug(&self) -> Option<&Drug> {
        self.selected_drug.as_ref()
    }

    pub fn insurance_options(&self) -> &[Insurance] {
        &self.insurance_options
    }

    pub fn selected_insurance(&self) -> Option<&Insurance> {
        self.selected_insurance.as_ref()
    }

    pub fn selected_ndc(&self) -> Option<&str> {
        self.selected_ndc.as_deref()
    }

    pub fn stage(&self) -> SearchStage {
        match (&self.selected_drug, &self.selected_ndc) {
            (Some(_), Some(_)) => SearchStage::ReadyToNavigate,
            (Some(_), None) => SearchStage::AwaitingNdc,
            (None, _) if !self.results.is_empty() => SearchStage::ResultsShown,
            (None, _) => SearchStage::Typing,
        }
    }

    /// The details view to open, once both a drug and an NDC are selected.
    pub fn navigation_target(&self) -> Option<NavigationRequest> {
        let drug = self.selected_drug.as_ref()?;
        let ndc = self.selected_ndc.as_ref()?;
        Some(NavigationRequest {
            drug_id: drug.id.clone(),
            ndc: ndc.clone(),
        })
    }

    // ── Query and suggestions ────────────────────────────────────────────────

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn show_suggestions(&mut self, suggestions: Vec<Drug>) {
        self.suggestions = suggestions;
        self.suggestions_visible = true;
    }

    pub fn hide_suggestions(&mut self) {
        self.suggestions_visible = false;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestions_visible = false;
    }

    // ── Results ──────────────────────────────────────────────────────────────

    /// Replace the committed results and start the selection over.
    pub fn commit_results(&mut self, results: Vec<Drug>) {
        self.results = results;
        self.reset_selection();
        self.suggestions_visible = false;
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    // ── Selection ────────────────────────────────────────────────────────────

    /// Select `drug`, clearing everything that depended on the previous one.
    pub fn select_drug(&mut self, drug: Drug) {
        self.insurance_options.clear();
        self.selected_insurance = None;
        self.selected_ndc = None;
        self.selected_drug = Some(drug);
        self.suggestions_visible = false;
    }

    /// Drop the selected drug and everything that depended on it.
    pub fn reset_selection(&mut self) {
        self.selected_drug = None;
        self.insurance_options.clear();
        self.selected_insurance = None;
        self.selected_ndc = None;
    }

    /// Install insurance options fetched for `drug_id`.
    ///
    /// Ignored (returns false) when `drug_id` is no longer the selected drug.
    pub fn set_insurance_options(&mut self, drug_id: &DrugId, options: Vec<Insurance>) -> bool {
        match &self.selected_drug {
            Some(drug) if &drug.id == drug_id => {
                self.insurance_options = options;
                true
            }
            _ => false,
        }
    }

    pub fn clear_insurance_options(&mut self) {
        self.insurance_options.clear();
        self.selected_insurance = None;
    }

    /// Select one of the offered insurance plans.
    pub fn select_insurance(&mut self, id: &InsuranceId) -> MedSearchResult<()> {
        if self.selected_drug.is_none() {
            return Err(MedSearchError::InvalidSelection {
                reason: "select a drug before choosing insurance".to_string(),
            });
        }
        let insurance = self
            .insurance_options
            .iter()
            .find(|i| &i.id == id)
            .cloned()
            .ok_or_else(|| MedSearchError::InvalidSelection {
                reason: format!("insurance '{}' is not offered for the selected drug", id),
            })?;
        self.selected_insurance = Some(insurance);
        Ok(())
    }

    pub fn clear_insurance_selection(&mut self) {
        self.selected_insurance = None;
    }

    /// Select an NDC of the selected drug. Anything else is rejected and the
    /// current selection is kept.
    pub fn select_ndc(&mut self, ndc: &str) -> MedSearchResult<()> {
        let drug = self
            .selected_drug
            .as_ref()
            .ok_or_else(|| MedSearchError::InvalidSelection {
                reason: "select a drug before choosing an NDC".to_string(),
            })?;
        if !drug.has_ndc(ndc) {
            return Err(MedSearchError::InvalidSelection {
                reason: format!("ndc '{}' is not a packaging of drug '{}'", ndc, drug.id),
            });
        }
        self.selected_ndc = Some(ndc.to_string());
        Ok(())
    }

    pub fn clear_ndc(&mut self) {
        self.selected_ndc = None;
    }
}
