//! Route gating.
//!
//! `Root` opens `Search`. `Login` is always public. Every other route needs
//! an established session and sends the user to `Login` without one.

use tracing::debug;

use medsearch_contracts::navigation::Route;

use crate::context::SessionContext;

/// The route actually shown when `requested` is opened under `session`.
pub fn guard(session: &SessionContext, requested: Route) -> Route {
    let requested = match requested {
        Route::Root => Route::Search,
        other => other,
    };

    if requested.requires_session() && !session.is_authenticated() {
        debug!(requested = %requested, "no session, redirecting to login");
        return Route::Login;
    }
    requested
}

/// Parse `path` and gate it. Unknown paths fall back to the root.
pub fn resolve(session: &SessionContext, path: &str) -> Route {
    guard(session, Route::parse(path).unwrap_or(Route::Root))
}
