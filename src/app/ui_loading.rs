use eframe::egui;

use super::state::StorefrontApp;

impl StorefrontApp {
    pub(crate) fn ui_loading(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(96.0);
            ui.heading("Storefront");
            ui.add_space(24.0);
            ui.add(egui::Spinner::new().size(36.0));
            ui.add_space(12.0);
            ui.label(egui::RichText::new("Opening the store…").weak());
        });
    }
}
