pub const LAST_LOADED_URL_KEY: &str = "last_loaded_url";
pub const LAST_REMOTE_URL_KEY: &str = "last_remote_url";

/// Snapshot of the two persisted URL slots. Empty and absent mean the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedUrlState {
    pub last_loaded_url: Option<String>,
    pub last_remote_url: Option<String>,
}

/// Result of entrypoint resolution for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEntrypoint {
    Native,
    Remote(String),
}

/// Normalizes a stored or fetched slot value: blank collapses to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
