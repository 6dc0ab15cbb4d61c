//! # medsearch-core
//!
//! The search-and-selection workflow behind the MedSearch views.
//!
//! This crate provides:
//! - The catalog, sales and authentication traits (`DrugCatalog`,
//!   `SalesSource`, `Authenticator`)
//! - `CancelableTimer` and the `SuggestionDebouncer` built on it
//! - `SelectionResolver` for drug-dependent insurance options
//! - `SearchSession`, the invariant-enforcing state record
//! - `SearchWorkflow`, the controller that ties them together
//! - `DrugDetails`, the details view loader, and TOML configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut workflow = SearchWorkflow::new(catalog, &config.search);
//! workflow.input("aspirin");
//! workflow.settle_next().await;          // suggestions after the quiet period
//! workflow.select_suggestion(0)?;
//! workflow.settle_next().await;          // insurance options
//! workflow.select_ndc("00000-0001-01")?;
//! if let SubmitOutcome::Navigate(req) = workflow.submit().await { /* open req.path() */ }
//! ```

pub mod config;
pub mod debounce;
pub mod details;
pub mod event;
pub mod resolver;
pub mod state;
pub mod timer;
pub mod traits;
pub mod workflow;

pub use config::MedSearchConfig;
pub use details::DrugDetails;
pub use state::{SearchSession, SearchStage};
pub use workflow::{SearchWorkflow, SubmitOutcome};
