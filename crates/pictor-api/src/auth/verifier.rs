use pictor_core::config::ApiKeyEntry;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Resolves a presented API key to the owner it authenticates.
///
/// Verification is synchronous: the static keyring needs no I/O, and the
/// middleware stays free of blocking work.
pub trait IdentityVerifier: Send + Sync {
    /// Returns the owner for a valid key, or None for an unknown one.
    fn verify(&self, presented_key: &str) -> Option<Uuid>;
}

/// Keyring populated from configuration at startup.
///
/// Every configured key is compared in constant time before the match
/// decision, so response timing does not narrow down key prefixes.
pub struct StaticKeyVerifier {
    entries: Vec<ApiKeyEntry>,
}

impl StaticKeyVerifier {
    pub fn new(entries: Vec<ApiKeyEntry>) -> Self {
        Self { entries }
    }
}

impl IdentityVerifier for StaticKeyVerifier {
    fn verify(&self, presented_key: &str) -> Option<Uuid> {
        let mut matched = None;
        for entry in &self.entries {
            if secure_compare(presented_key, &entry.key) {
                matched = Some(entry.owner_id);
            }
        }
        matched
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
