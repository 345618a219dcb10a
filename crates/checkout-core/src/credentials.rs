//! Gateway Credentials
//!
//! Username/password pair used for the Basic-Auth authentication call.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Source of the gateway username and password
pub trait CredentialProvider: Send + Sync {
    fn username(&self) -> &str;
    fn password(&self) -> &str;

    /// `Authorization` header value for the authentication call
    fn basic_authorization(&self) -> String {
        basic_auth_header(self.username(), self.password())
    }
}

/// Plain in-memory credentials, immutable for the lifetime of a client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialProvider for Credentials {
    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `Basic base64(username:password)`
pub fn basic_auth_header(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}
