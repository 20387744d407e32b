use egui::{Align2, Color32, FontId, Response, Sense, Stroke, Ui, vec2};

/// A square palette button showing a single glyph
pub struct ToolButton<'a> {
    pub icon: &'a str,
    pub selected: bool,
}

impl<'a> ToolButton<'a> {
    pub fn new(icon: &'a str, selected: bool) -> Self {
        Self { icon, selected }
    }

    pub fn show(&self, ui: &mut Ui) -> Response {
        let button_size = vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                Color32::from_rgb(100, 181, 246) // Light blue when selected
            } else if response.hovered() {
                Color32::from_gray(40)
            } else {
                Color32::from_gray(30)
            };

            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                Color32::BLACK
            } else {
                Color32::WHITE
            };
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.icon,
                FontId::proportional(24.0),
                text_color,
            );

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    Stroke::new(2.0, Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(self.icon)
    }
}
