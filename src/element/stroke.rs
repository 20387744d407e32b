use egui::{Pos2, Rect};

use super::{MarkId, common};
use crate::surface::DrawingSurface;

/// A freehand pen stroke: an ordered run of points drawn at a fixed width
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeMark {
    id: MarkId,
    points: Vec<Pos2>,
    line_width: f32,
}

impl StrokeMark {
    /// Start a stroke at `anchor`
    pub fn new(anchor: Pos2, line_width: f32) -> Self {
        debug_assert!(line_width > 0.0, "stroke width must be positive");
        Self {
            id: MarkId::new(),
            points: vec![anchor],
            line_width,
        }
    }

    pub fn id(&self) -> MarkId {
        self.id
    }

    /// Get the points that make up this stroke
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub(crate) fn push(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn bounds(&self) -> Rect {
        common::calculate_bounds(&self.points, self.line_width / 2.0)
    }

    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        // A single point is a zero-length path: nothing visible
        if self.points.len() < 2 {
            return;
        }

        surface.stroke_path(&self.points, self.line_width);
    }
}
