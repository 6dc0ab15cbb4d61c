//! # medsearch-catalog
//!
//! Drug catalog provider for the MedSearch workflow.
//!
//! `InMemoryCatalog` implements both `DrugCatalog` and `SalesSource` over a
//! dataset held in memory: the fictional mock data in [`mock_data`] by
//! default, or a JSON data file named in the `[catalog]` configuration.
//!
//! No external systems are contacted.

pub mod memory;
pub mod mock_data;

pub use memory::{matches_query, CatalogData, InMemoryCatalog};
