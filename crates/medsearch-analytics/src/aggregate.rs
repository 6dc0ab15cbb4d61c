//! Sales aggregation for the dashboard.
//!
//! Both functions are a single pass over the records; nothing is sorted.

use medsearch_contracts::sales::{BelowNetPriceSale, DrugSales, PharmacySale, SalesAnalytics};

/// Totals plus per-drug figures, grouped by drug name in the order each drug
/// first appears in `sales`.
pub fn summarize(sales: &[PharmacySale]) -> SalesAnalytics {
    let mut analytics = SalesAnalytics::default();

    for sale in sales {
        analytics.total_sales += u64::from(sale.quantity);
        analytics.total_scripts += 1;
        analytics.total_revenue += sale.revenue();
        if sale.is_below_net_price() {
            analytics.below_net_price_count += 1;
        }

        match analytics
            .sales_by_drug
            .iter_mut()
            .find(|d| d.drug_name == sale.drug_name)
        {
            Some(entry) => {
                entry.scripts += 1;
                entry.revenue += sale.revenue();
            }
            None => analytics.sales_by_drug.push(DrugSales {
                drug_name: sale.drug_name.clone(),
                scripts: 1,
                revenue: sale.revenue(),
            }),
        }
    }

    analytics
}

/// Rows for the below-net-price alert table, in record order.
pub fn below_net_price(sales: &[PharmacySale]) -> Vec<BelowNetPriceSale> {
    sales
        .iter()
        .filter(|s| s.is_below_net_price())
        .map(|s| BelowNetPriceSale {
            sale_id: s.id.clone(),
            pharmacy_name: s.pharmacy_name.clone(),
            drug_name: s.drug_name.clone(),
            sale_price: s.sale_price,
            net_price: s.net_price,
            difference: s.net_price - s.sale_price,
        })
        .collect()
}
