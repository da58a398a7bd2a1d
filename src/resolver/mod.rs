//! Startup entrypoint policy: decide between the remote web storefront and
//! the native fallback.

mod session;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::models::{
    non_empty, ResolvedEntrypoint, SurfaceEvent, LAST_LOADED_URL_KEY, LAST_REMOTE_URL_KEY,
};
use crate::storage::{load_url_state, KeyValueStore};

pub use session::{EntrypointSession, SessionPhase};

/// Operator-controlled source of the remote entrypoint URL.
#[async_trait]
pub trait RemoteConfigStore: Send + Sync {
    /// `Ok(None)` means the store answered but no URL is configured.
    async fn fetch_entrypoint_url(&self) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Every variant degrades to [`ResolvedEntrypoint::Native`]; none reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum EntrypointError {
    #[error("no network connectivity")]
    NoConnectivity,
    #[error("remote config lookup failed: {0}")]
    RemoteLookupFailed(String),
    #[error("main frame load failed for {url}: {reason}")]
    MainFrameLoadFailed { url: String, reason: String },
}

/// Outcome of the remote configuration step.
#[derive(Debug)]
enum Lookup {
    Remote(String),
    Native,
    Fallback(EntrypointError),
}

#[derive(Clone)]
pub struct EntrypointResolver {
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn RemoteConfigStore>,
    probe: Arc<dyn ConnectivityProbe>,
    remote_timeout: Duration,
}

impl EntrypointResolver {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteConfigStore>,
        probe: Arc<dyn ConnectivityProbe>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            store,
            remote,
            probe,
            remote_timeout,
        }
    }

    pub async fn resolve_entrypoint(&self) -> ResolvedEntrypoint {
        if !self.probe.is_reachable().await {
            info!(reason = %EntrypointError::NoConnectivity, "entrypoint: native");
            return ResolvedEntrypoint::Native;
        }

        let state = load_url_state(self.store.as_ref());
        if let Some(url) = state.last_loaded_url {
            info!(url = %url, "entrypoint: last loaded url");
            return ResolvedEntrypoint::Remote(url);
        }

        match self.lookup_remote().await {
            Lookup::Remote(url) => {
                if let Err(e) = self.store.set(LAST_REMOTE_URL_KEY, &url) {
                    warn!(error = ?e, "persist last remote url failed");
                }
                info!(url = %url, "entrypoint: remote config url");
                ResolvedEntrypoint::Remote(url)
            }
            Lookup::Native => {
                info!("entrypoint: native (no remote url configured)");
                ResolvedEntrypoint::Native
            }
            Lookup::Fallback(err) => match state.last_remote_url {
                Some(url) => {
                    warn!(error = %err, url = %url, "entrypoint: cached remote url");
                    ResolvedEntrypoint::Remote(url)
                }
                None => {
                    warn!(error = %err, "entrypoint: native");
                    ResolvedEntrypoint::Native
                }
            },
        }
    }

    async fn lookup_remote(&self) -> Lookup {
        let fetch = self.remote.fetch_entrypoint_url();
        match tokio::time::timeout(self.remote_timeout, fetch).await {
            Ok(Ok(url)) => match non_empty(url) {
                Some(url) => Lookup::Remote(url),
                None => Lookup::Native,
            },
            Ok(Err(e)) => Lookup::Fallback(EntrypointError::RemoteLookupFailed(format!("{e:#}"))),
            Err(_) => Lookup::Fallback(EntrypointError::RemoteLookupFailed(format!(
                "timed out after {} ms",
                self.remote_timeout.as_millis()
            ))),
        }
    }

    pub fn record_successful_load(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        match self.store.set(LAST_LOADED_URL_KEY, url) {
            Ok(()) => debug!(url, "recorded successful load"),
            Err(e) => warn!(url, error = ?e, "persist last loaded url failed"),
        }
    }

    pub fn record_load_failure(&self, url: &str, reason: &str) -> ResolvedEntrypoint {
        let err = EntrypointError::MainFrameLoadFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        warn!(error = %err, "switching to native");

        let stored = match self.store.get(LAST_LOADED_URL_KEY) {
            Ok(v) => non_empty(v),
            Err(e) => {
                warn!(error = ?e, "read last loaded url failed");
                None
            }
        };
        if stored.as_deref() == Some(url.trim()) {
            if let Err(e) = self.store.remove(LAST_LOADED_URL_KEY) {
                warn!(error = ?e, "clear last loaded url failed");
            }
        }
        ResolvedEntrypoint::Native
    }

    /// Feeds one web surface event into the persisted state and the session.
    pub fn apply_surface_event(
        &self,
        session: &mut EntrypointSession,
        event: SurfaceEvent,
    ) -> SurfaceOutcome {
        match event {
            SurfaceEvent::Loaded { url } => {
                self.record_successful_load(&url);
                SurfaceOutcome::Shown(url)
            }
            SurfaceEvent::LoadFailed { url, reason } => {
                self.record_load_failure(&url, &reason);
                session.fail_remote(&url);
                SurfaceOutcome::FellBack
            }
            SurfaceEvent::Closed => SurfaceOutcome::Closed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOutcome {
    Shown(String),
    FellBack,
    Closed,
}
