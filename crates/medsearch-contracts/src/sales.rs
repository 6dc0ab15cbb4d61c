//! Pharmacy sales records and the dashboard aggregates built from them.

use serde::{Deserialize, Serialize};

/// One dispensed script as reported by a pharmacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacySale {
    pub id: String,
    pub pharmacy_name: String,
    pub drug_name: String,
    /// Price per unit the pharmacy charged.
    pub sale_price: f64,
    /// Net price per unit of the drug.
    pub net_price: f64,
    pub quantity: u32,
}

impl PharmacySale {
    /// Revenue of this script: `sale_price * quantity`.
    pub fn revenue(&self) -> f64 {
        self.sale_price * f64::from(self.quantity)
    }

    /// Strictly below net price; a sale at net price is not flagged.
    pub fn is_below_net_price(&self) -> bool {
        self.sale_price < self.net_price
    }
}

/// Per-drug totals for the "Sales by Drug" table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugSales {
    pub drug_name: String,
    pub scripts: u64,
    pub revenue: f64,
}

/// Totals shown across the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    /// Sum of quantities over every record.
    pub total_sales: u64,
    /// Number of records.
    pub total_scripts: u64,
    /// Sum of `sale_price * quantity`.
    pub total_revenue: f64,
    pub below_net_price_count: u64,
    /// Grouped by drug name, in the order each drug first appears.
    pub sales_by_drug: Vec<DrugSales>,
}

/// A row of the below-net-price alert table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BelowNetPriceSale {
    pub sale_id: String,
    pub pharmacy_name: String,
    pub drug_name: String,
    pub sale_price: f64,
    pub net_price: f64,
    /// `net_price - sale_price`, always positive.
    pub difference: f64,
}
