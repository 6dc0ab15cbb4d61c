//! Trait seams between the search workflow and its data sources.
//!
//! - `DrugCatalog`  : drug lookups and insurance options
//! - `SalesSource`  : pharmacy sales records for the dashboard
//! - `Authenticator`: credential check issuing session tokens
//!
//! All three are async and object-safe so front ends can hold them as
//! `Arc<dyn _>` and swap the mock dataset for a real backend.

use async_trait::async_trait;

use medsearch_contracts::{
    drug::{Drug, DrugId, Insurance},
    error::MedSearchResult,
    sales::PharmacySale,
    session::SessionToken,
};

/// Read-only access to the drug catalog.
///
/// Implementations must be free of side effects: every method is a pure read
/// over an immutable (or remote) dataset. Results come back in catalog order,
/// never relevance-ranked.
#[async_trait]
pub trait DrugCatalog: Send + Sync {
    /// Case-insensitive substring match against name and class name.
    async fn search_drugs(&self, query: &str) -> MedSearchResult<Vec<Drug>>;

    /// Like `search_drugs`, additionally matching `query` as an exact
    /// substring of any NDC code.
    async fn suggest_drugs(&self, query: &str) -> MedSearchResult<Vec<Drug>>;

    /// Fails with `NotFound` when no drug has this id.
    async fn drug_by_id(&self, id: &DrugId) -> MedSearchResult<Drug>;

    /// Insurance plans for a drug.
    ///
    /// Takes the drug id so per-drug coverage can be added later, even though
    /// the current data model returns one fixed list.
    async fn insurance_options(&self, drug_id: &DrugId) -> MedSearchResult<Vec<Insurance>>;

    /// Data for the details view of one packaging of a drug.
    async fn drug_details(&self, id: &DrugId, _ndc: &str) -> MedSearchResult<Drug> {
        self.drug_by_id(id).await
    }
}

/// Source of pharmacy sales records.
#[async_trait]
pub trait SalesSource: Send + Sync {
    async fn pharmacy_sales(&self) -> MedSearchResult<Vec<PharmacySale>>;
}

/// Credential check performed by the login view.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return a fresh session token, or `InvalidCredentials`.
    async fn login(&self, email: &str, password: &str) -> MedSearchResult<SessionToken>;
}
