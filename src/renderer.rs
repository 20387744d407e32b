use egui::Color32;

use crate::controller::InteractionController;
use crate::element::Mark;
use crate::history::DocumentHistory;
use crate::surface::DrawingSurface;

/// Repaints a drawing surface from document and interaction state.
///
/// Every repaint starts from a blank background and redraws everything, so
/// overlapping stroke segments never accumulate and repeated repaints with the
/// same inputs produce the same output. Fine for the handful of marks a
/// sketch holds; there is no incremental path for large histories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    background: Color32,
}

impl Renderer {
    pub fn new(background: Color32) -> Self {
        Self { background }
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    /// Full repaint: background, committed marks in order, the stroke being
    /// drawn, then the preview when nothing is under construction
    pub fn repaint(
        &self,
        surface: &mut dyn DrawingSurface,
        history: &DocumentHistory,
        controller: &InteractionController,
    ) {
        self.render_document(surface, history.committed());

        // A dragged sticker is already part of `committed`
        if let Some(mark) = controller.in_progress() {
            mark.render(surface);
        }

        if !controller.is_constructing() {
            if let Some(preview) = controller.preview() {
                preview.render(surface);
            }
        }
    }

    /// Background plus the given marks, nothing transient
    pub fn render_document(&self, surface: &mut dyn DrawingSurface, marks: &[Mark]) {
        surface.fill_background(self.background);
        for mark in marks {
            mark.render(surface);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Color32::WHITE)
    }
}
