//! Progression tokens (sync keys).

/// Wire value of the bootstrap token: "no prior state" / lineage reset.
pub const BOOTSTRAP_KEY: &str = "0";

/// An opaque, server-issued progression token.
///
/// Issuance is strictly ordered within one (device, collection) lineage:
/// each token derives from a monotonic sequence counter, so a value is
/// never reused until the lineage itself is reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncKey(String);

impl SyncKey {
    /// The reserved bootstrap token.
    pub fn bootstrap() -> Self {
        Self(BOOTSTRAP_KEY.to_string())
    }

    /// Wraps a token received from the wire without interpreting it.
    pub fn from_wire(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Issues the token for a sequence position.
    pub fn issue(sequence: u64) -> Self {
        Self(sequence.to_string())
    }

    /// True if this is the bootstrap token.
    pub fn is_bootstrap(&self) -> bool {
        self.0 == BOOTSTRAP_KEY
    }

    /// The token's wire form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SyncKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_detection() {
        assert!(SyncKey::bootstrap().is_bootstrap());
        assert!(SyncKey::from_wire("0").is_bootstrap());
        assert!(!SyncKey::issue(1).is_bootstrap());
    }

    #[test]
    fn issuance_is_strictly_ordered_and_unique() {
        let keys: Vec<SyncKey> = (1..=100).map(SyncKey::issue).collect();
        for pair in keys.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        let mut dedup = keys.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), keys.len());
    }
}
