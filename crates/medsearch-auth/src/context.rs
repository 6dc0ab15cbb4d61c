//! The explicit session context handed to every view that needs it.

use chrono::{DateTime, Utc};
use tracing::info;

use medsearch_contracts::{error::MedSearchResult, navigation::Route, session::SessionToken};
use medsearch_core::traits::Authenticator;

#[derive(Debug, Clone)]
struct Established {
    email: String,
    token: SessionToken,
    at: DateTime<Utc>,
}

/// Who is logged in, if anyone.
///
/// Set by a successful login and cleared by logout; nothing else writes it.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Established>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn establish(&mut self, email: impl Into<String>, token: SessionToken) {
        let email = email.into();
        info!(email = %email, "session established");
        self.current = Some(Established {
            email,
            token,
            at: Utc::now(),
        });
    }

    /// Check credentials and establish the session on success.
    ///
    /// Returns the route to open next. On failure the current session, if
    /// any, is left as it was.
    pub async fn login(
        &mut self,
        auth: &dyn Authenticator,
        email: &str,
        password: &str,
    ) -> MedSearchResult<Route> {
        let token = auth.login(email, password).await?;
        self.establish(email, token);
        Ok(Route::Search)
    }

    /// Logout. Returns true if a session was actually cleared.
    pub fn clear(&mut self) -> bool {
        match self.current.take() {
            Some(session) => {
                info!(email = %session.email, "session cleared");
                true
            }
            None => false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.current.as_ref().map(|s| &s.token)
    }

    pub fn email(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.email.as_str())
    }

    pub fn established_at(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(|s| s.at)
    }
}
