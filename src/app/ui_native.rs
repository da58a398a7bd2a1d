use eframe::egui;

use super::{state::StorefrontApp, types::View};
use crate::models::format_price;

impl StorefrontApp {
    pub(crate) fn ui_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar").show(ctx, |ui| {
            ui.heading("Shop");
            ui.separator();

            if ui
                .selectable_label(self.active_view == View::Products, "Products")
                .clicked()
            {
                self.active_view = View::Products;
            }
            let cart_label = format!("Cart ({})", self.cart.item_count());
            if ui
                .selectable_label(self.active_view == View::Cart, cart_label)
                .clicked()
            {
                self.active_view = View::Cart;
            }
        });
    }

    pub(crate) fn ui_view(&mut self, ui: &mut egui::Ui) {
        if !self.status.is_empty() {
            ui.label(&self.status);
            ui.add_space(8.0);
        }

        match self.active_view {
            View::Products => self.ui_products(ui),
            View::Cart => self.ui_cart(ui),
        }
    }

    fn ui_products(&mut self, ui: &mut egui::Ui) {
        ui.heading("Products");
        ui.add_space(8.0);

        if self.catalog.is_empty() {
            ui.label("No products available offline.");
            return;
        }

        let mut add: Option<String> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for p in &self.catalog {
                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::same(12.0))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(&p.name);
                                if !p.description.is_empty() {
                                    ui.label(egui::RichText::new(&p.description).weak());
                                }
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("Add to cart").clicked() {
                                    add = Some(p.id.clone());
                                }
                                ui.label(format_price(p.price_cents));
                            });
                        });
                    });
                ui.add_space(6.0);
            }
        });

        if let Some(id) = add {
            self.add_to_cart(&id);
        }
    }

    fn ui_cart(&mut self, ui: &mut egui::Ui) {
        ui.heading("Cart");
        ui.add_space(8.0);

        if self.cart.item_count() == 0 {
            ui.label("Your cart is empty.");
            return;
        }

        let mut remove: Option<String> = None;
        egui::Grid::new("cart_lines")
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                for p in &self.catalog {
                    let qty = self.cart.quantity(&p.id);
                    if qty == 0 {
                        continue;
                    }
                    ui.label(&p.name);
                    ui.label(format!("× {}", qty));
                    ui.label(format_price(p.price_cents * u64::from(qty)));
                    if ui.small_button("−").clicked() {
                        remove = Some(p.id.clone());
                    }
                    ui.end_row();
                }
            });

        if let Some(id) = remove {
            self.cart.remove_one(&id);
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.strong(format!("Total {}", format_price(self.cart.total_cents(&self.catalog))));
            if ui.button("Clear").clicked() {
                self.clear_cart();
            }
        });
    }
}
