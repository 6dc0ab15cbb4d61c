//! Shared fixtures for the workflow integration tests.

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;

use medsearch_contracts::{
    drug::{Drug, DrugId, Insurance, InsuranceId},
    error::{MedSearchError, MedSearchResult},
};
use medsearch_core::traits::DrugCatalog;

pub fn drug(id: &str, name: &str, class_name: &str, ndc: &[&str]) -> Drug {
    Drug {
        id: DrugId::new(id),
        name: name.to_string(),
        class_name: class_name.to_string(),
        description: String::new(),
        ndc: ndc.iter().map(|s| s.to_string()).collect(),
        net_price: 2.5,
        alternatives: vec![],
    }
}

/// In-memory catalog that counts calls and can be told to fail or stall.
pub struct StubCatalog {
    pub drugs: Vec<Drug>,
    pub insurances: Vec<Insurance>,
    pub suggest_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub insurance_calls: AtomicUsize,
    pub suggest_queries: Mutex<Vec<String>>,
    pub fail_suggest: AtomicBool,
    pub fail_search: AtomicBool,
    pub fail_insurance: AtomicBool,
    pub lookup_delay: Mutex<Duration>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self {
            drugs: vec![
                drug("1", "Aspirin 81mg", "NSAID", &["00000-0001-01"]),
                drug("2", "Ibuprofen 200mg", "NSAID", &["00000-0002-01", "00000-0002-02"]),
                drug("3", "Atorvastatin 20mg", "Statin", &["00000-0003-01"]),
            ],
            insurances: ["Medicare", "Medicaid", "BlueCross"]
                .iter()
                .enumerate()
                .map(|(i, name)| Insurance {
                    id: InsuranceId::new((i + 1).to_string()),
                    name: name.to_string(),
                })
                .collect(),
            suggest_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            insurance_calls: AtomicUsize::new(0),
            suggest_queries: Mutex::new(Vec::new()),
            fail_suggest: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
            fail_insurance: AtomicBool::new(false),
            lookup_delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }

    pub fn insurance_calls(&self) -> usize {
        self.insurance_calls.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.lookup_delay.lock().unwrap() = delay;
    }

    async fn stall(&self) {
        let delay = *self.lookup_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn matching(&self, query: &str, include_ndc: bool) -> Vec<Drug> {
        let q = query.to_lowercase();
        self.drugs
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&q)
                    || d.class_name.to_lowercase().contains(&q)
                    || (include_ndc && d.ndc.iter().any(|n| n.contains(query)))
            })
            .cloned()
            .collect()
    }
}

fn backend_down() -> MedSearchError {
    MedSearchError::LookupFailure {
        reason: "backend unavailable".to_string(),
    }
}

#[async_trait]
impl DrugCatalog for StubCatalog {
    async fn search_drugs(&self, query: &str) -> MedSearchResult<Vec<Drug>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(backend_down());
        }
        Ok(self.matching(query, false))
    }

    async fn suggest_drugs(&self, query: &str) -> MedSearchResult<Vec<Drug>> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        self.suggest_queries.lock().unwrap().push(query.to_string());
        self.stall().await;
        if self.fail_suggest.load(Ordering::SeqCst) {
            return Err(backend_down());
        }
        Ok(self.matching(query, true))
    }

    async fn drug_by_id(&self, id: &DrugId) -> MedSearchResult<Drug> {
        self.drugs
            .iter()
            .find(|d| &d.id == id)
            .cloned()
            .ok_or_else(|| MedSearchError::drug_not_found(id.as_str()))
    }

    async fn insurance_options(&self, _drug_id: &DrugId) -> MedSearchResult<Vec<Insurance>> {
        self.insurance_calls.fetch_add(1, Ordering::SeqCst);
        self.stall().await;
        if self.fail_insurance.load(Ordering::SeqCst) {
            return Err(MedSearchError::NotFound {
                entity: "coverage".to_string(),
                id: "plan-table".to_string(),
            });
        }
        Ok(self.insurances.clone())
    }
}
