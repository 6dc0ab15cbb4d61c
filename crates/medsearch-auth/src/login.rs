//! Credential check against configured accounts.
//!
//! Passwords are never stored in clear: an account carries the lowercase hex
//! SHA-256 of its password, and a login attempt hashes the submitted password
//! the same way before comparing.

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use medsearch_contracts::{
    error::{MedSearchError, MedSearchResult},
    session::SessionToken,
};
use medsearch_core::{
    config::{AccountConfig, AuthSettings},
    traits::Authenticator,
};

/// The account used when the configuration lists none.
pub const DEFAULT_EMAIL: &str = "test@example.com";
pub const DEFAULT_PASSWORD: &str = "Test123!";

/// Lowercase hex SHA-256 of `password`.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Checks credentials against a fixed set of accounts.
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    accounts: Vec<AccountConfig>,
}

impl StaticAuthenticator {
    pub fn new(accounts: Vec<AccountConfig>) -> Self {
        Self { accounts }
    }

    /// Accounts from `[auth]`, or the built-in test account when none are set.
    pub fn from_settings(settings: &AuthSettings) -> Self {
        if settings.accounts.is_empty() {
            return Self::default();
        }
        Self::new(settings.accounts.clone())
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn issue_token(email: &str) -> SessionToken {
        let mut hasher = Sha256::new();
        hasher.update(email.as_bytes());
        hasher.update(uuid::Uuid::new_v4().as_bytes());
        hasher.update(Utc::now().to_rfc3339().as_bytes());
        SessionToken(hex::encode(hasher.finalize()))
    }
}

impl Default for StaticAuthenticator {
    fn default() -> Self {
        Self::new(vec![AccountConfig {
            email: DEFAULT_EMAIL.to_string(),
            password_sha256: password_digest(DEFAULT_PASSWORD),
        }])
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn login(&self, email: &str, password: &str) -> MedSearchResult<SessionToken> {
        let digest = password_digest(password);
        let matched = self
            .accounts
            .iter()
            .any(|a| a.email == email && a.password_sha256.eq_ignore_ascii_case(&digest));

        if !matched {
            warn!(email = %email, "login rejected");
            return Err(MedSearchError::InvalidCredentials);
        }

        info!(email = %email, "login accepted");
        Ok(Self::issue_token(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = password_digest("Test123!");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(digest, password_digest("Test123!"));
        assert_ne!(digest, password_digest("test123!"));
    }

    #[tokio::test]
    async fn default_account_logs_in() {
        let auth = StaticAuthenticator::default();
        let token = auth.login(DEFAULT_EMAIL, DEFAULT_PASSWORD).await.unwrap();
        assert_eq!(token.as_str().len(), 64);
    }

    #[tokio::test]
    async fn each_login_issues_a_fresh_token() {
        let auth = StaticAuthenticator::default();
        let a = auth.login(DEFAULT_EMAIL, DEFAULT_PASSWORD).await.unwrap();
        let b = auth.login(DEFAULT_EMAIL, DEFAULT_PASSWORD).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn wrong_password_or_email_is_rejected() {
        let auth = StaticAuthenticator::default();
        for (email, password) in [
            (DEFAULT_EMAIL, "wrong"),
            ("TEST@example.com", DEFAULT_PASSWORD),
            ("", ""),
        ] {
            assert_eq!(
                auth.login(email, password).await.unwrap_err(),
                MedSearchError::InvalidCredentials
            );
        }
    }

    #[tokio::test]
    async fn configured_accounts_replace_the_default() {
        let auth = StaticAuthenticator::from_settings(&AuthSettings {
            accounts: vec![AccountConfig {
                email: "pharmacist@example.com".to_string(),
                password_sha256: password_digest("s3cret").to_uppercase(),
            }],
        });

        assert_eq!(auth.account_count(), 1);
        assert!(auth.login("pharmacist@example.com", "s3cret").await.is_ok());
        assert!(auth.login(DEFAULT_EMAIL, DEFAULT_PASSWORD).await.is_err());
    }

    #[test]
    fn empty_settings_fall_back_to_the_test_account() {
        let auth = StaticAuthenticator::from_settings(&AuthSettings::default());
        assert_eq!(auth.account_count(), 1);
    }
}
