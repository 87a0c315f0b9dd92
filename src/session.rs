use std::fmt;
use std::sync::{Arc, OnceLock};

/// Opaque bearer token issued by the login endpoint. Sent back verbatim in
/// the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Session-scoped holder for the single credential.
///
/// Created empty when the session starts, written once by a successful
/// login and read by every request after that. Clones share the same slot.
/// Nothing is persisted: the token is gone when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    slot: Arc<OnceLock<Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the token. Returns false if a token was already stored; the
    /// first one is kept.
    pub fn store(&self, credential: Credential) -> bool {
        self.slot.set(credential).is_ok()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.slot.get()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.get().is_none()
    }
}
