use serde::{Deserialize, Serialize};

/// One line of JSON written by the `storefront-web` helper on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// Main frame finished loading.
    Loaded { url: String },
    LoadFailed { url: String, reason: String },
    Closed,
}

impl SurfaceEvent {
    pub fn to_line(&self) -> String {
        // Serializing a plain tagged enum of strings cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"event":"closed"}"#.to_string())
    }

    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }
}
