use eframe::egui;
use std::time::{Duration, Instant};

use super::state::StorefrontApp;

impl StorefrontApp {
    pub(crate) fn tick_connectivity(&mut self) {
        // 1) Harvest completed background check
        if let Some(handle) = self.online_task.take() {
            if handle.is_finished() {
                let ok = self.rt.block_on(async { handle.await }).unwrap_or(false);
                self.online = Some(ok);
                self.online_last_checked = Some(Instant::now());
            } else {
                self.online_task = Some(handle);
            }
        }

        // 2) Schedule next check if due
        let due = self
            .online_last_checked
            .map(|t| t.elapsed() > Duration::from_secs(10))
            .unwrap_or(true);

        if !due || self.online_task.is_some() {
            return;
        }

        let probe = self.probe.clone();
        self.online_task = Some(self.rt.spawn(async move { probe.is_reachable().await }));
    }

    pub(crate) fn ui_header_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Storefront");
                ui.separator();

                let (dot, text) = match self.online {
                    Some(true) => (
                        egui::RichText::new("●").color(egui::Color32::GREEN),
                        "Online",
                    ),
                    Some(false) => (
                        egui::RichText::new("●").color(egui::Color32::RED),
                        "Offline",
                    ),
                    None => (
                        egui::RichText::new("●").color(egui::Color32::GRAY),
                        "Checking…",
                    ),
                };
                ui.label(dot);
                ui.label(text);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // Retry is the only way out of the native fallback; it stays
                    // visible but disabled while a resolve is pending.
                    if self.session.can_retry() || self.session.is_resolving() {
                        let label = if self.session.is_resolving() {
                            "Connecting…"
                        } else {
                            "Try online store"
                        };
                        let retry = ui.add_enabled(self.session.can_retry(), egui::Button::new(label));
                        if retry.clicked() {
                            self.online_last_checked = None;
                            self.start_resolve();
                        }
                    }
                });
            });
        });
    }
}
