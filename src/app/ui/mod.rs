// src/app/ui/mod.rs
pub mod grid;
pub mod topbar;

use eframe::egui as eg;

impl crate::app::RecoApp {
    pub(crate) fn ui_render_idle_prompt(&self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.heading("Your Personal Movie Guide");
            ui.add_space(8.0);
            ui.label("Enter a movie you love and we'll recommend similar films you might enjoy!");
        });
    }

    pub(crate) fn ui_render_loading(&self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.add(eg::Spinner::new().size(24.0));
            ui.add_space(8.0);
            ui.label("Searching…");
        });
    }

    pub(crate) fn ui_render_error(&self, ui: &mut eg::Ui) {
        let msg = self.session.error_message().unwrap_or("Something went wrong.");
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.colored_label(eg::Color32::from_rgb(240, 120, 120), msg);
        });
    }

    pub(crate) fn ui_render_no_matches(&self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label("No similar titles found. Try another movie.");
        });
    }
}
