//! Built-in dataset used when no catalog data file is configured.
//!
//! All data in this module is hardcoded and fictional. NDCs use the reserved
//! `00000` labeler code so they can never collide with a real product.

use medsearch_contracts::{
    drug::{Alternative, Drug, DrugId, Insurance, InsuranceId},
    sales::PharmacySale,
};

fn alt(id: &str, name: &str, class_name: &str) -> Alternative {
    Alternative {
        id: DrugId::new(id),
        name: name.to_string(),
        class_name: class_name.to_string(),
    }
}

fn drug(
    id: &str,
    name: &str,
    class_name: &str,
    description: &str,
    ndc: &[&str],
    net_price: f64,
    alternatives: Vec<Alternative>,
) -> Drug {
    Drug {
        id: DrugId::new(id),
        name: name.to_string(),
        class_name: class_name.to_string(),
        description: description.to_string(),
        ndc: ndc.iter().map(|s| s.to_string()).collect(),
        net_price,
        alternatives,
    }
}

// ── Drugs ────────────────────────────────────────────────────────────────────

/// The catalog, in display order.
pub fn mock_drugs() -> Vec<Drug> {
    vec![
        drug(
            "1",
            "Aspirin 81mg",
            "NSAID",
            "Low-dose aspirin for antiplatelet therapy and cardiovascular event prevention.",
            &["00000-0001-01"],
            4.50,
            vec![alt("2", "Ibuprofen 200mg", "NSAID"), alt("3", "Naproxen 220mg", "NSAID")],
        ),
        drug(
            "2",
            "Ibuprofen 200mg",
            "NSAID",
            "Nonsteroidal anti-inflammatory for pain, fever and inflammation.",
            &["00000-0002-01", "00000-0002-02"],
            6.25,
            vec![alt("3", "Naproxen 220mg", "NSAID"), alt("1", "Aspirin 81mg", "NSAID")],
        ),
        drug(
            "3",
            "Naproxen 220mg",
            "NSAID",
            "Long-acting NSAID for musculoskeletal pain and dysmenorrhea.",
            &["00000-0003-01", "00000-0003-02"],
            7.80,
            vec![alt("2", "Ibuprofen 200mg", "NSAID")],
        ),
        drug(
            "4",
            "Lisinopril 10mg",
            "ACE Inhibitor",
            "Angiotensin-converting enzyme inhibitor for hypertension and heart failure.",
            &["00000-0004-01", "00000-0004-02", "00000-0004-03"],
            3.10,
            vec![alt("5", "Losartan 50mg", "Angiotensin II Receptor Blocker")],
        ),
        drug(
            "5",
            "Losartan 50mg",
            "Angiotensin II Receptor Blocker",
            "ARB for hypertension; an option for patients with ACE inhibitor cough.",
            &["00000-0005-01"],
            5.40,
            vec![alt("4", "Lisinopril 10mg", "ACE Inhibitor")],
        ),
        drug(
            "6",
            "Atorvastatin 20mg",
            "HMG-CoA Reductase Inhibitor",
            "Statin for primary and secondary prevention of atherosclerotic disease.",
            &["00000-0006-01", "00000-0006-02"],
            8.95,
            vec![alt("7", "Rosuvastatin 10mg", "HMG-CoA Reductase Inhibitor")],
        ),
        drug(
            "7",
            "Rosuvastatin 10mg",
            "HMG-CoA Reductase Inhibitor",
            "High-intensity statin for LDL cholesterol reduction.",
            &["00000-0007-01"],
            11.20,
            vec![alt("6", "Atorvastatin 20mg", "HMG-CoA Reductase Inhibitor")],
        ),
        drug(
            "8",
            "Metformin 500mg",
            "Biguanide",
            "First-line oral therapy for type 2 diabetes mellitus.",
            &["00000-0008-01", "00000-0008-02"],
            2.75,
            vec![],
        ),
    ]
}

// ── Insurance ────────────────────────────────────────────────────────────────

/// Plans offered for every drug.
pub fn mock_insurances() -> Vec<Insurance> {
    ["Medicare", "Medicaid", "BlueCross"]
        .iter()
        .enumerate()
        .map(|(i, name)| Insurance {
            id: InsuranceId::new((i + 1).to_string()),
            name: name.to_string(),
        })
        .collect()
}

// ── Pharmacy sales ───────────────────────────────────────────────────────────

fn sale(id: &str, pharmacy: &str, drug: &str, sale_price: f64, net_price: f64, quantity: u32) -> PharmacySale {
    PharmacySale {
        id: id.to_string(),
        pharmacy_name: pharmacy.to_string(),
        drug_name: drug.to_string(),
        sale_price,
        net_price,
        quantity,
    }
}

/// Sales reported by three fictional pharmacies.
pub fn mock_pharmacy_sales() -> Vec<PharmacySale> {
    vec![
        sale("s-001", "Main Street Pharmacy", "Aspirin 81mg", 5.00, 4.50, 30),
        sale("s-002", "Main Street Pharmacy", "Lisinopril 10mg", 2.90, 3.10, 90),
        sale("s-003", "Riverside Drug", "Aspirin 81mg", 4.25, 4.50, 60),
        sale("s-004", "Riverside Drug", "Atorvastatin 20mg", 9.50, 8.95, 30),
        sale("s-005", "Oakwood Health Mart", "Metformin 500mg", 2.75, 2.75, 180),
        sale("s-006", "Oakwood Health Mart", "Ibuprofen 200mg", 6.00, 6.25, 24),
        sale("s-007", "Main Street Pharmacy", "Atorvastatin 20mg", 9.00, 8.95, 90),
        sale("s-008", "Riverside Drug", "Losartan 50mg", 5.90, 5.40, 30),
    ]
}
