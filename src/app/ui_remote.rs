use eframe::egui;

use super::state::StorefrontApp;

impl StorefrontApp {
    pub(crate) fn ui_remote(&mut self, ui: &mut egui::Ui, url: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(64.0);
            ui.heading("The store is open in its own window");
            ui.add_space(8.0);
            ui.label(egui::RichText::new(url).monospace().weak());
            ui.add_space(16.0);
            if self.surface.is_some() {
                ui.spinner();
            }
            if !self.status.is_empty() {
                ui.add_space(8.0);
                ui.label(&self.status);
            }
        });
    }
}
