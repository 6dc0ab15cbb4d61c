//! Resolution of data that depends on the selected drug.
//!
//! Selecting a drug needs its insurance options. `SelectionResolver` offers
//! the direct form (`select_drug`, awaited by the caller) and the dispatched
//! form used by the workflow (`dispatch`, which reports through a
//! `LookupEvent` tagged with a sequence number). Dispatching again aborts the
//! previous in-flight lookup.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use medsearch_contracts::{
    drug::{Drug, DrugId, Insurance},
    error::MedSearchResult,
};

use crate::{
    event::{LookupEvent, LookupSender},
    traits::DrugCatalog,
};

pub struct SelectionResolver {
    catalog: Arc<dyn DrugCatalog>,
    events: LookupSender,
    seq: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl SelectionResolver {
    pub fn new(catalog: Arc<dyn DrugCatalog>, events: LookupSender) -> Self {
        Self {
            catalog,
            events,
            seq: 0,
            in_flight: None,
        }
    }

    /// Fetch the insurance options for `drug`.
    ///
    /// Any failure is reported as `LookupFailure`.
    pub async fn select_drug(&self, drug: &Drug) -> MedSearchResult<Vec<Insurance>> {
        fetch_insurance(self.catalog.as_ref(), &drug.id).await
    }

    /// Start fetching insurance options for `drug` in the background.
    ///
    /// Returns the sequence number the resulting event will carry. Must be
    /// called from within a tokio runtime.
    pub fn dispatch(&mut self, drug: &Drug) -> u64 {
        let seq = self.cancel();
        let catalog = Arc::clone(&self.catalog);
        let events = self.events.clone();
        let drug_id = drug.id.clone();

        debug!(seq, drug_id = %drug_id, "resolving insurance options");

        self.in_flight = Some(tokio::spawn(async move {
            let result = fetch_insurance(catalog.as_ref(), &drug_id).await;
            if events
                .send(LookupEvent::InsuranceOptions { seq, drug_id, result })
                .is_err()
            {
                debug!(seq, "workflow closed, insurance options dropped");
            }
        }));

        seq
    }

    /// Abort the in-flight lookup (if any) and invalidate earlier sequences.
    pub fn cancel(&mut self) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.seq += 1;
        self.seq
    }

    pub fn latest_seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for SelectionResolver {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

async fn fetch_insurance(catalog: &dyn DrugCatalog, drug_id: &DrugId) -> MedSearchResult<Vec<Insurance>> {
    catalog.insurance_options(drug_id).await.map_err(|e| {
        warn!(drug_id = %drug_id, error = %e, "insurance lookup failed");
        e.into_lookup_failure(&format!("insurance options for drug '{}'", drug_id))
    })
}
