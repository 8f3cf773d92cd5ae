// src/app/ui/grid.rs
use eframe::egui as eg;

use crate::app::present::NO_IMAGE_LABEL;

pub const H_SPACING: f32 = 10.0;
pub const V_SPACING: f32 = 12.0;

const CARD_W: f32 = 180.0;
const TEXT_H: f32 = 118.0;

fn draw_match_chip(p: &eg::Painter, rect: eg::Rect, label: &str) {
    if label.is_empty() {
        return;
    }
    let pad = 6.0;
    let size = eg::vec2(12.0 + 7.0 * label.len() as f32, 20.0);
    let r = eg::Rect::from_min_size(
        eg::pos2(rect.left() + pad, rect.bottom() - pad - size.y),
        size,
    );

    let visuals = p.ctx().style().visuals.clone();
    let bg = visuals.extreme_bg_color.gamma_multiply(0.92);
    let fg = visuals.strong_text_color();

    p.rect_filled(r, eg::Rounding::same(6.0), bg);
    p.rect_stroke(r, eg::Rounding::same(6.0), eg::Stroke::new(1.0, fg));
    p.text(
        r.center(),
        eg::Align2::CENTER_CENTER,
        label,
        eg::FontId::monospace(12.0),
        fg,
    );
}

impl crate::app::RecoApp {
    pub(crate) fn ui_render_grid(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        let card_h: f32 = CARD_W * 1.5 + TEXT_H;
        let mut uploads_left = super::super::MAX_UPLOADS_PER_FRAME;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_space(8.0);

                // Columns + centering
                let avail = ui.available_width();
                let cols = ((avail + H_SPACING) / (CARD_W + H_SPACING))
                    .floor()
                    .max(1.0) as usize;
                let used = cols as f32 * CARD_W + (cols.saturating_sub(1)) as f32 * H_SPACING;
                let left_pad = ((avail - used) * 0.5).max(0.0);
                if left_pad > 0.0 {
                    ui.add_space(left_pad);
                }

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);

                    for idx in 0..self.cards.len() {
                        // opportunistic texture upload
                        if uploads_left > 0 && self.try_lazy_upload_card(ctx, idx) {
                            uploads_left -= 1;
                        }

                        ui.allocate_ui_with_layout(
                            eg::vec2(CARD_W, card_h),
                            eg::Layout::top_down(eg::Align::Min),
                            |ui| {
                                ui.set_min_size(eg::vec2(CARD_W, card_h));
                                let rect = ui.max_rect();

                                let poster_rect = eg::Rect::from_min_max(
                                    rect.min,
                                    eg::pos2(rect.min.x + CARD_W, rect.min.y + CARD_W * 1.5),
                                );
                                let text_rect = eg::Rect::from_min_max(
                                    eg::pos2(rect.min.x, poster_rect.max.y),
                                    rect.max,
                                );

                                let Some(card) = self.cards.get(idx) else {
                                    return;
                                };

                                // Poster, or the declarative "no image" block
                                if let Some(tex) = &card.tex {
                                    ui.painter().image(
                                        tex.id(),
                                        poster_rect,
                                        eg::Rect::from_min_max(
                                            eg::pos2(0.0, 0.0),
                                            eg::pos2(1.0, 1.0),
                                        ),
                                        eg::Color32::WHITE,
                                    );
                                } else {
                                    ui.painter().rect_filled(
                                        poster_rect,
                                        6.0,
                                        eg::Color32::from_gray(40),
                                    );
                                    if card.poster_unavailable() {
                                        ui.painter().text(
                                            poster_rect.center(),
                                            eg::Align2::CENTER_CENTER,
                                            NO_IMAGE_LABEL,
                                            eg::FontId::proportional(13.0),
                                            eg::Color32::from_gray(180),
                                        );
                                    }
                                }

                                if let Some(label) = &card.match_label {
                                    draw_match_chip(
                                        ui.painter(),
                                        poster_rect,
                                        &format!("{label} Match"),
                                    );
                                }

                                // Title + overview + trailer link
                                ui.allocate_ui_at_rect(text_rect, |ui| {
                                    ui.add(
                                        eg::Label::new(
                                            eg::RichText::new(&card.title).size(15.0).strong(),
                                        )
                                        .truncate(),
                                    );
                                    // Bounded overview height; truncation here
                                    // is styling, the full text stays on the card.
                                    ui.allocate_ui(
                                        eg::vec2(CARD_W, 58.0),
                                        |ui| {
                                            ui.set_clip_rect(ui.max_rect());
                                            ui.add(
                                                eg::Label::new(
                                                    eg::RichText::new(&card.overview)
                                                        .size(12.5)
                                                        .weak(),
                                                )
                                                .wrap(),
                                            );
                                        },
                                    );
                                    ui.hyperlink_to("▶ Watch Trailer", &card.trailer_url);
                                });
                            },
                        );
                    }
                });
            });
    }
}
