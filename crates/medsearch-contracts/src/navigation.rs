//! View routes and navigation requests.
//!
//! The search workflow never navigates by itself: it emits a
//! `NavigationRequest` and whichever front end hosts it switches views.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::drug::DrugId;

/// True when `value` can be used as a drug id or NDC inside a details path
/// without escaping: non-empty, no whitespace or control characters, and none
/// of `/ ? & # = %`.
pub fn is_path_safe(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "/?&#=%".contains(c))
}

/// A request to open the drug details view for one packaging of a drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub drug_id: DrugId,
    pub ndc: String,
}

impl NavigationRequest {
    /// Render as `/drug/{drugId}?ndc={ndc}`.
    pub fn path(&self) -> String {
        format!("/drug/{}?ndc={}", self.drug_id, self.ndc)
    }

    pub fn route(&self) -> Route {
        Route::DrugDetails {
            drug_id: self.drug_id.clone(),
            ndc: self.ndc.clone(),
        }
    }
}

/// Every view the application can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Root,
    Login,
    Search,
    DrugDetails { drug_id: DrugId, ndc: String },
    Dashboard,
    Upload,
}

impl Route {
    /// Parse a path such as `/search` or `/drug/3?ndc=00000-0003-01`.
    ///
    /// Returns `None` for unknown paths and for a details path without a drug
    /// id or an `ndc` query parameter.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let path = path.trim_end_matches('/');

        match path {
            "" => Some(Route::Root),
            "/login" => Some(Route::Login),
            "/search" => Some(Route::Search),
            "/dashboard" => Some(Route::Dashboard),
            "/upload" => Some(Route::Upload),
            _ => {
                let drug_id = path.strip_prefix("/drug/").filter(|id| is_path_safe(id))?;
                let ndc = query?
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("ndc="))
                    .filter(|ndc| is_path_safe(ndc))?;
                Some(Route::DrugDetails {
                    drug_id: DrugId::new(drug_id),
                    ndc: ndc.to_string(),
                })
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Search => "/search".to_string(),
            Route::DrugDetails { drug_id, ndc } => format!("/drug/{}?ndc={}", drug_id, ndc),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Upload => "/upload".to_string(),
        }
    }

    /// True for every view behind the authentication gate.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Root | Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
