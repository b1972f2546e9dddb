//! Authentication context for the conversation endpoint.
//!
//! The gate only admits or rejects a connection. Accounts, registration and
//! token issuance live elsewhere.

use subtle::ConstantTimeEq;

use crate::config::AuthApiSecret;

/// Authenticated caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auth {
    /// Id of the matched API secret, `None` when auth is disabled
    pub id: Option<String>,
}

impl Auth {
    /// Context used when authentication is disabled.
    pub fn empty() -> Self {
        Self { id: None }
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }
}

/// Find the id of the secret matching `token`.
///
/// Every configured secret is compared in constant time, and the scan does
/// not stop at the first match.
pub fn match_api_secret_id<'a>(token: &str, secrets: &'a [AuthApiSecret]) -> Option<&'a str> {
    let mut matched = None;
    for entry in secrets {
        let equal: bool = entry.secret.as_bytes().ct_eq(token.as_bytes()).into();
        if equal && matched.is_none() {
            matched = Some(entry.id.as_str());
        }
    }
    matched
}
