//! Loading the drug details view.

use serde::Serialize;
use tracing::warn;

use medsearch_contracts::{
    drug::{Alternative, Drug},
    error::MedSearchResult,
    navigation::NavigationRequest,
};

use crate::traits::DrugCatalog;

/// Everything the details view renders for one packaging of a drug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugDetails {
    pub drug: Drug,
    /// The NDC the user navigated with.
    pub ndc: String,
    /// False when `ndc` is not one of the drug's listed NDCs.
    pub ndc_listed: bool,
}

impl DrugDetails {
    /// Resolve a navigation request against the catalog.
    ///
    /// Fails with `NotFound` when the drug id is unknown. An unlisted NDC is
    /// shown as-is and logged.
    pub async fn load(catalog: &dyn DrugCatalog, request: &NavigationRequest) -> MedSearchResult<Self> {
        let drug = catalog.drug_details(&request.drug_id, &request.ndc).await?;
        let ndc_listed = drug.has_ndc(&request.ndc);
        if !ndc_listed {
            warn!(drug_id = %drug.id, ndc = %request.ndc, "details requested for an unlisted NDC");
        }
        Ok(Self {
            drug,
            ndc: request.ndc.clone(),
            ndc_listed,
        })
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.drug.alternatives
    }

    /// Net price formatted for display, e.g. `$4.50`.
    pub fn net_price_label(&self) -> String {
        format!("${:.2}", self.drug.net_price)
    }
}
