use std::collections::BTreeMap;

use serde::Deserialize;

/// Body returned by the remote configuration endpoint.
///
/// Only string entries are meaningful to the shell; anything else under a
/// known key is treated as absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfigResponse {
    pub entries: BTreeMap<String, serde_json::Value>,
}

impl RemoteConfigResponse {
    pub fn string_entry(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .and_then(|v| v.as_str())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
