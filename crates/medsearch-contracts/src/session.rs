//! Session tokens issued by a successful login.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer token identifying a logged-in session.
///
/// Front ends keep it for the lifetime of the session only; nothing inspects
/// its contents.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials: keep them out of debug output and logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}
