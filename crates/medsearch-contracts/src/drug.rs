//! Drug catalog records.
//!
//! Drugs and insurances are read-only: they are loaded wholesale from a
//! catalog provider and never mutated by the search workflow. Field names
//! serialize in camelCase so catalog data files keep the shape used by the
//! web client's mock data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a drug in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrugId(pub String);

impl DrugId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of an insurance plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsuranceId(pub String);

impl InsuranceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InsuranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reduced view of another drug, shown on the details page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub id: DrugId,
    pub name: String,
    pub class_name: String,
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    pub id: DrugId,
    /// Display name, e.g. "Aspirin 81mg".
    pub name: String,
    /// Therapeutic class, e.g. "NSAID".
    pub class_name: String,
    #[serde(default)]
    pub description: String,
    /// National Drug Codes for the packagings of this drug. Never empty in a
    /// well-formed catalog.
    pub ndc: Vec<String>,
    /// Net price in dollars. Non-negative.
    pub net_price: f64,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

impl Drug {
    /// Return true if `code` is one of this drug's NDCs.
    pub fn has_ndc(&self, code: &str) -> bool {
        self.ndc.iter().any(|n| n == code)
    }

    /// The reduced view of this drug used in alternative lists.
    pub fn as_alternative(&self) -> Alternative {
        Alternative {
            id: self.id.clone(),
            name: self.name.clone(),
            class_name: self.class_name.clone(),
        }
    }
}

/// An insurance plan that may cover a drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insurance {
    pub id: InsuranceId,
    pub name: String,
}
