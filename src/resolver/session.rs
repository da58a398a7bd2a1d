use crate::models::ResolvedEntrypoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Resolving,
    Native,
    Remote(String),
}

/// Per-session entrypoint lifecycle.
///
/// `Uninitialized -> Resolving -> {Native | Remote}`. `Remote` only drops to
/// `Native` through a main-frame load failure; leaving `Native` needs an
/// explicit retry.
#[derive(Debug, Clone)]
pub struct EntrypointSession {
    phase: SessionPhase,
}

impl Default for EntrypointSession {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
        }
    }
}

impl EntrypointSession {
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_resolving(&self) -> bool {
        self.phase == SessionPhase::Resolving
    }

    /// A user retry is only offered from the native fallback.
    pub fn can_retry(&self) -> bool {
        self.phase == SessionPhase::Native
    }

    /// Returns false when a resolution is already in flight.
    pub fn begin_resolve(&mut self) -> bool {
        if self.is_resolving() {
            return false;
        }
        self.phase = SessionPhase::Resolving;
        true
    }

    /// Ignored unless a resolution is in flight.
    pub fn complete(&mut self, entrypoint: ResolvedEntrypoint) -> bool {
        if !self.is_resolving() {
            return false;
        }
        self.phase = match entrypoint {
            ResolvedEntrypoint::Native => SessionPhase::Native,
            ResolvedEntrypoint::Remote(url) => SessionPhase::Remote(url),
        };
        true
    }

    /// Only the URL currently shown can fail the session over to native.
    pub fn fail_remote(&mut self, url: &str) -> bool {
        match &self.phase {
            SessionPhase::Remote(current) if current == url => {
                self.phase = SessionPhase::Native;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_resolve_is_rejected() {
        let mut s = EntrypointSession::default();
        assert_eq!(s.phase(), &SessionPhase::Uninitialized);
        assert!(s.begin_resolve());
        assert!(!s.begin_resolve());
        assert!(s.complete(ResolvedEntrypoint::Native));
        assert_eq!(s.phase(), &SessionPhase::Native);
    }

    #[test]
    fn completion_outside_resolving_is_ignored() {
        let mut s = EntrypointSession::default();
        assert!(!s.complete(ResolvedEntrypoint::Remote("https://x".into())));
        assert_eq!(s.phase(), &SessionPhase::Uninitialized);
    }

    #[test]
    fn remote_falls_back_only_for_current_url() {
        let mut s = EntrypointSession::default();
        s.begin_resolve();
        s.complete(ResolvedEntrypoint::Remote("https://x".into()));

        assert!(!s.fail_remote("https://other"));
        assert_eq!(s.phase(), &SessionPhase::Remote("https://x".into()));

        assert!(!s.can_retry());
        assert!(s.fail_remote("https://x"));
        assert_eq!(s.phase(), &SessionPhase::Native);
        assert!(s.can_retry());
        assert!(!s.fail_remote("https://x"));
    }

    #[test]
    fn retry_leaves_native() {
        let mut s = EntrypointSession::default();
        assert!(!s.can_retry());
        s.begin_resolve();
        assert!(!s.can_retry());
        s.complete(ResolvedEntrypoint::Native);
        assert!(s.can_retry());
        assert!(s.begin_resolve());
        assert!(!s.can_retry());
        assert!(s.complete(ResolvedEntrypoint::Remote("https://x".into())));
        assert_eq!(s.phase(), &SessionPhase::Remote("https://x".into()));
    }
}
