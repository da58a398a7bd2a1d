use std::sync::Arc;

use anyhow::{Context, Result};

mod actions;
mod state;
mod types;
mod ui_header;
mod ui_loading;
mod ui_native;
mod ui_remote;

use state::StorefrontApp;

use crate::config::ShellSettings;
use crate::remote::{HttpConnectivityProbe, HttpRemoteConfig};
use crate::resolver::{ConnectivityProbe, EntrypointResolver};
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

pub fn run_app(settings: ShellSettings) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("create tokio runtime")?;

    let store: Arc<dyn KeyValueStore> = match JsonFileStore::open_default() {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "url state store opened");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(error = ?e, "url state store unavailable; using memory");
            Arc::new(MemoryStore::new())
        }
    };
    let probe: Arc<dyn ConnectivityProbe> = Arc::new(HttpConnectivityProbe::new(&settings));
    let remote = Arc::new(HttpRemoteConfig::new(&settings)?);
    let resolver = EntrypointResolver::new(store, remote, probe.clone(), settings.remote_timeout);

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Storefront",
        native_options,
        Box::new(move |cc| {
            apply_theme(&cc.egui_ctx);
            Ok(Box::new(StorefrontApp::new(settings, resolver, probe, rt)))
        }),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))
}

fn apply_theme(ctx: &egui::Context) {
    let accent = egui::Color32::from_rgb(0xF2, 0x6B, 0x3A); // #f26b3a
    let accent2 = egui::Color32::from_rgb(0x4D, 0xD0, 0xB5); // #4dd0b5
    let bg = egui::Color32::from_rgb(0x12, 0x11, 0x16); // #121116
    let panel = egui::Color32::from_rgba_premultiplied(0x1E, 0x1C, 0x24, 230);

    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::dark();
    style.visuals.panel_fill = bg;
    style.visuals.window_fill = panel;
    style.visuals.faint_bg_color = egui::Color32::from_rgb(0x19, 0x17, 0x1F);

    style.visuals.widgets.noninteractive.bg_fill = panel;
    style.visuals.widgets.inactive.rounding = egui::Rounding::same(10.0);
    style.visuals.widgets.hovered.rounding = egui::Rounding::same(10.0);
    style.visuals.widgets.active.rounding = egui::Rounding::same(10.0);
    style.visuals.window_rounding = egui::Rounding::same(12.0);

    style.visuals.selection.bg_fill = accent.linear_multiply(0.55);
    style.visuals.selection.stroke.color = accent;
    style.visuals.hyperlink_color = accent2;

    let border = egui::Stroke::new(1.0, egui::Color32::from_rgba_premultiplied(0xF2, 0x6B, 0x3A, 60));
    style.visuals.window_stroke = border;
    style.visuals.widgets.noninteractive.bg_stroke = border;
    style.visuals.widgets.inactive.bg_stroke = border;
    style.visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, accent);

    ctx.set_style(style);
}
