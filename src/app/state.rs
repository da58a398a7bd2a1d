use eframe::egui;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    config::ShellSettings,
    models::{bundled_catalog, Cart, Product, ResolvedEntrypoint},
    resolver::{ConnectivityProbe, EntrypointResolver, EntrypointSession, SessionPhase},
    surface::SurfaceHandle,
};

use super::types::View;

pub(crate) struct StorefrontApp {
    pub(crate) settings: ShellSettings,
    pub(crate) resolver: EntrypointResolver,
    pub(crate) session: EntrypointSession,
    pub(crate) status: String,

    pub(crate) resolve_task: Option<tokio::task::JoinHandle<ResolvedEntrypoint>>,
    pub(crate) resolve_started_at: Option<Instant>,
    pub(crate) surface: Option<SurfaceHandle>,

    // Connectivity indicator
    pub(crate) probe: Arc<dyn ConnectivityProbe>,
    pub(crate) online: Option<bool>,
    pub(crate) online_last_checked: Option<Instant>,
    pub(crate) online_task: Option<tokio::task::JoinHandle<bool>>,

    // Native storefront
    pub(crate) active_view: View,
    pub(crate) catalog: Vec<Product>,
    pub(crate) cart: Cart,

    pub(crate) rt: tokio::runtime::Runtime,
}

impl StorefrontApp {
    pub(crate) fn new(
        settings: ShellSettings,
        resolver: EntrypointResolver,
        probe: Arc<dyn ConnectivityProbe>,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        let catalog = bundled_catalog().unwrap_or_else(|e| {
            tracing::warn!(error = ?e, "native catalog unavailable");
            Vec::new()
        });

        let mut app = Self {
            settings,
            resolver,
            session: EntrypointSession::default(),
            status: "".to_string(),
            resolve_task: None,
            resolve_started_at: None,
            surface: None,
            probe,
            online: None,
            online_last_checked: None,
            online_task: None,
            active_view: View::Products,
            catalog,
            cart: Cart::default(),
            rt,
        };

        app.start_resolve();
        app
    }
}

impl eframe::App for StorefrontApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick_resolve();
        self.tick_surface(ctx);
        self.tick_connectivity();

        self.ui_header_bar(ctx);
        match self.session.phase().clone() {
            SessionPhase::Uninitialized | SessionPhase::Resolving => {
                egui::CentralPanel::default().show(ctx, |ui| self.ui_loading(ui));
            }
            SessionPhase::Remote(url) => {
                egui::CentralPanel::default().show(ctx, |ui| self.ui_remote(ui, &url));
            }
            SessionPhase::Native => {
                self.ui_sidebar(ctx);
                egui::CentralPanel::default().show(ctx, |ui| self.ui_view(ui));
            }
        }

        // Background work only reports back when polled.
        if self.resolve_task.is_some() || self.surface.is_some() || self.online_task.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
