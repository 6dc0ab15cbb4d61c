//! The dashboard view model.

use serde::Serialize;
use tracing::{info, warn};

use medsearch_contracts::{
    error::MedSearchResult,
    sales::{BelowNetPriceSale, PharmacySale, SalesAnalytics},
};
use medsearch_core::traits::SalesSource;

use crate::aggregate::{below_net_price, summarize};

/// Everything the dashboard renders, computed from one fetch of the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub sales: Vec<PharmacySale>,
    pub analytics: SalesAnalytics,
    pub alerts: Vec<BelowNetPriceSale>,
}

impl Dashboard {
    pub fn from_sales(sales: Vec<PharmacySale>) -> Self {
        Self {
            analytics: summarize(&sales),
            alerts: below_net_price(&sales),
            sales,
        }
    }

    /// Fetch the sales records and aggregate them.
    ///
    /// Fetch failures come back as `LookupFailure`.
    pub async fn load(source: &dyn SalesSource) -> MedSearchResult<Self> {
        let sales = source.pharmacy_sales().await.map_err(|e| {
            let e = e.into_lookup_failure("pharmacy sales");
            warn!(error = %e, "dashboard load failed");
            e
        })?;
        let dashboard = Self::from_sales(sales);
        info!(
            scripts = dashboard.analytics.total_scripts,
            alerts = dashboard.alerts.len(),
            "dashboard loaded"
        );
        Ok(dashboard)
    }
}
