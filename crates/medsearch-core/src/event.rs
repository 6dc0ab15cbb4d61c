//! Results of asynchronous lookups, delivered back to the workflow.
//!
//! Lookup tasks never touch session state directly. They send a
//! `LookupEvent` over an unbounded channel and the workflow, the only writer
//! of that state, decides whether the result is still current.

use tokio::sync::mpsc;

use medsearch_contracts::{
    drug::{Drug, DrugId, Insurance},
    error::MedSearchResult,
};

#[derive(Debug)]
pub enum LookupEvent {
    /// Suggestions fetched after a debounce quiet period.
    Suggestions {
        seq: u64,
        query: String,
        result: MedSearchResult<Vec<Drug>>,
    },
    /// Insurance options for a selected drug.
    InsuranceOptions {
        seq: u64,
        drug_id: DrugId,
        result: MedSearchResult<Vec<Insurance>>,
    },
}

impl LookupEvent {
    /// The sequence number the issuing component tagged this lookup with.
    pub fn seq(&self) -> u64 {
        match self {
            LookupEvent::Suggestions { seq, .. } | LookupEvent::InsuranceOptions { seq, .. } => *seq,
        }
    }
}

pub type LookupSender = mpsc::UnboundedSender<LookupEvent>;
pub type LookupReceiver = mpsc::UnboundedReceiver<LookupEvent>;

pub fn lookup_channel() -> (LookupSender, LookupReceiver) {
    mpsc::unbounded_channel()
}
