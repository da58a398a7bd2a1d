use eframe::egui;
use std::time::Instant;

use tracing::{info, warn};

use crate::{
    models::{format_price, ResolvedEntrypoint, SurfaceEvent},
    resolver::{SessionPhase, SurfaceOutcome},
    surface,
};

use super::state::StorefrontApp;

impl StorefrontApp {
    /// Kicks off entrypoint resolution off the UI thread. No-op while one is pending.
    pub(crate) fn start_resolve(&mut self) {
        if !self.session.begin_resolve() {
            return;
        }
        let resolver = self.resolver.clone();
        self.resolve_started_at = Some(Instant::now());
        self.status = "".to_string();
        self.resolve_task = Some(
            self.rt
                .spawn(async move { resolver.resolve_entrypoint().await }),
        );
    }

    pub(crate) fn tick_resolve(&mut self) {
        let Some(handle) = self.resolve_task.take() else {
            return;
        };
        if !handle.is_finished() {
            self.resolve_task = Some(handle);
            return;
        }

        let entrypoint = self
            .rt
            .block_on(async { handle.await })
            .unwrap_or_else(|e| {
                warn!(error = %e, "entrypoint task failed");
                ResolvedEntrypoint::Native
            });
        if let Some(started) = self.resolve_started_at.take() {
            info!(elapsed_ms = started.elapsed().as_millis() as u64, ?entrypoint, "entrypoint resolved");
        }

        self.session.complete(entrypoint.clone());
        if let ResolvedEntrypoint::Remote(url) = entrypoint {
            self.open_remote(&url);
        }
    }

    fn open_remote(&mut self, url: &str) {
        let opened = {
            let _guard = self.rt.enter();
            surface::open_surface(url, self.settings.surface_load_timeout)
        };
        match opened {
            Ok(handle) => {
                self.status = format!("Loading {}", url);
                self.surface = Some(handle);
            }
            Err(e) => {
                self.fail_over_to_native(url, &format!("{e:#}"));
            }
        }
    }

    fn fail_over_to_native(&mut self, url: &str, reason: &str) {
        self.apply_surface_event(SurfaceEvent::LoadFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        });
    }

    fn apply_surface_event(&mut self, event: SurfaceEvent) -> bool {
        match self.resolver.apply_surface_event(&mut self.session, event) {
            SurfaceOutcome::Shown(url) => {
                self.status = format!("Showing {}", url);
                false
            }
            SurfaceOutcome::FellBack => {
                self.status =
                    "The online storefront is unavailable. Showing the offline catalogue.".to_string();
                false
            }
            SurfaceOutcome::Closed => true,
        }
    }

    pub(crate) fn tick_surface(&mut self, ctx: &egui::Context) {
        let Some(mut handle) = self.surface.take() else {
            return;
        };

        let mut closed = false;
        while let Some(ev) = handle.try_next() {
            if self.apply_surface_event(ev) {
                closed = true;
                break;
            }
        }

        if !closed {
            self.surface = Some(handle);
            return;
        }

        // Closing the web window while it is the active entrypoint ends the session.
        if matches!(self.session.phase(), SessionPhase::Remote(current) if current == handle.url()) {
            info!("web surface closed; exiting");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    pub(crate) fn add_to_cart(&mut self, product_id: &str) {
        self.cart.add(product_id);
        self.status = format!(
            "Cart: {} item(s), {}",
            self.cart.item_count(),
            format_price(self.cart.total_cents(&self.catalog))
        );
    }

    pub(crate) fn clear_cart(&mut self) {
        self.cart.clear();
        self.status = "Cart cleared.".to_string();
    }
}
