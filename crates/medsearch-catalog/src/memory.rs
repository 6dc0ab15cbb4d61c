//! In-memory implementation of `DrugCatalog` and `SalesSource`.
//!
//! `InMemoryCatalog` is the reference catalog provider. It holds the whole
//! dataset in memory and answers every query with a linear scan in catalog
//! order. The dataset is either the built-in mock data or a JSON file with
//! the same shape:
//!
//! ```json
//! { "drugs": [...], "insurances": [...], "sales": [...] }
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use medsearch_contracts::{
    drug::{Drug, DrugId, Insurance},
    error::{MedSearchError, MedSearchResult},
    navigation::is_path_safe,
    sales::PharmacySale,
};
use medsearch_core::{
    config::CatalogSettings,
    traits::{DrugCatalog, SalesSource},
};

use crate::mock_data::{mock_drugs, mock_insurances, mock_pharmacy_sales};

/// Serialized form of a complete dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub drugs: Vec<Drug>,
    pub insurances: Vec<Insurance>,
    pub sales: Vec<PharmacySale>,
}

impl CatalogData {
    /// Reject datasets that would break the workflow's assumptions: duplicate
    /// drug ids, drugs without NDCs, negative prices, and ids or NDCs that do
    /// not survive a round trip through a details path.
    fn validate(&self) -> MedSearchResult<()> {
        let mut seen = std::collections::HashSet::new();
        for drug in &self.drugs {
            if !seen.insert(&drug.id) {
                return Err(MedSearchError::ConfigError {
                    reason: format!("duplicate drug id '{}' in catalog data", drug.id),
                });
            }
            if !is_path_safe(drug.id.as_str()) {
                return Err(MedSearchError::ConfigError {
                    reason: format!("drug id '{}' cannot be used in a details path", drug.id),
                });
            }
            if drug.ndc.is_empty() {
                return Err(MedSearchError::ConfigError {
                    reason: format!("drug '{}' has no NDC codes", drug.id),
                });
            }
            if let Some(code) = drug.ndc.iter().find(|code| !is_path_safe(code)) {
                return Err(MedSearchError::ConfigError {
                    reason: format!("drug '{}' has NDC '{}' that cannot be used in a details path", drug.id, code),
                });
            }
            if !(drug.net_price >= 0.0) {
                return Err(MedSearchError::ConfigError {
                    reason: format!("drug '{}' has a negative or invalid net price", drug.id),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    data: CatalogData,
}

impl InMemoryCatalog {
    pub fn new(data: CatalogData) -> MedSearchResult<Self> {
        data.validate()?;
        Ok(Self { data })
    }

    /// The built-in fictional dataset.
    pub fn with_mock_data() -> Self {
        Self {
            data: CatalogData {
                drugs: mock_drugs(),
                insurances: mock_insurances(),
                sales: mock_pharmacy_sales(),
            },
        }
    }

    /// Parse a JSON dataset.
    pub fn from_json_str(s: &str) -> MedSearchResult<Self> {
        let data: CatalogData = serde_json::from_str(s).map_err(|e| MedSearchError::ConfigError {
            reason: format!("failed to parse catalog JSON: {}", e),
        })?;
        Self::new(data)
    }

    pub fn from_json_file(path: &Path) -> MedSearchResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedSearchError::ConfigError {
            reason: format!("failed to read catalog file '{}': {}", path.display(), e),
        })?;
        let catalog = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            drugs = catalog.data.drugs.len(),
            sales = catalog.data.sales.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// The configured data file, or the mock dataset when none is set.
    pub fn from_settings(settings: &CatalogSettings) -> MedSearchResult<Self> {
        match &settings.data_file {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::with_mock_data()),
        }
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.data.drugs
    }

    fn find(&self, query: &str, include_ndc: bool) -> Vec<Drug> {
        self.data
            .drugs
            .iter()
            .filter(|drug| matches_query(drug, query, include_ndc))
            .cloned()
            .collect()
    }
}

/// Case-insensitive substring match on name or class name; with
/// `include_ndc`, also a case-sensitive substring match on any NDC.
///
/// The empty query matches every drug.
pub fn matches_query(drug: &Drug, query: &str, include_ndc: bool) -> bool {
    let needle = query.to_lowercase();
    drug.name.to_lowercase().contains(&needle)
        || drug.class_name.to_lowercase().contains(&needle)
        || (include_ndc && drug.ndc.iter().any(|code| code.contains(query)))
}

#[async_trait]
impl DrugCatalog for InMemoryCatalog {
    async fn search_drugs(&self, query: &str) -> MedSearchResult<Vec<Drug>> {
        let found = self.find(query, false);
        debug!(query = %query, count = found.len(), "catalog search");
        Ok(found)
    }

    async fn suggest_drugs(&self, query: &str) -> MedSearchResult<Vec<Drug>> {
        let found = self.find(query, true);
        debug!(query = %query, count = found.len(), "catalog suggestions");
        Ok(found)
    }

    async fn drug_by_id(&self, id: &DrugId) -> MedSearchResult<Drug> {
        self.data
            .drugs
            .iter()
            .find(|d| &d.id == id)
            .cloned()
            .ok_or_else(|| MedSearchError::drug_not_found(id.as_str()))
    }

    async fn insurance_options(&self, _drug_id: &DrugId) -> MedSearchResult<Vec<Insurance>> {
        // Coverage does not vary per drug in this dataset.
        Ok(self.data.insurances.clone())
    }
}

#[async_trait]
impl SalesSource for InMemoryCatalog {
    async fn pharmacy_sales(&self) -> MedSearchResult<Vec<PharmacySale>> {
        Ok(self.data.sales.clone())
    }
}
