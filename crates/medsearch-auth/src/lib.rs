//! # medsearch-auth
//!
//! Login and route gating for MedSearch front ends.
//!
//! - [`login::StaticAuthenticator`] checks an email and password against the
//!   configured accounts and issues an opaque `SessionToken`.
//! - [`context::SessionContext`] is the explicit record of who is logged in.
//!   Front ends own one and pass it to whatever needs it.
//! - [`gate::guard`] decides which view a requested route actually opens.

pub mod context;
pub mod gate;
pub mod login;

pub use context::SessionContext;
pub use gate::{guard, resolve};
pub use login::{password_digest, StaticAuthenticator, DEFAULT_EMAIL, DEFAULT_PASSWORD};
