//! # medsearch-contracts
//!
//! Shared types, routes, and error contracts for the MedSearch workspace.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, route parsing and error types.

pub mod drug;
pub mod error;
pub mod navigation;
pub mod sales;
pub mod session;
pub mod upload;
