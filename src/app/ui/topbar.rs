// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::types::Phase;

impl crate::app::RecoApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui) {
        ui.add_space(6.0);
        ui.vertical_centered(|ui| {
            ui.heading("SmartStream Recommender");
            ui.label(eg::RichText::new("Discover your next favorite movie").weak());
        });
        ui.add_space(8.0);

        let mut do_submit = false;
        ui.horizontal(|ui| {
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.query)
                    .hint_text("Enter a movie title like 'Toy Story'")
                    .desired_width(340.0),
            );
            // Enter while the input has focus is the same submit path as
            // the button.
            if resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter)) {
                do_submit = true;
            }

            let label = if self.session.phase() == Phase::Loading {
                "Searching…"
            } else {
                "Get Recommendations"
            };
            if ui.button(label).clicked() {
                do_submit = true;
            }
        });

        if do_submit {
            self.submit();
        }
    }
}
