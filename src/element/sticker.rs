use egui::{Pos2, Rect, Vec2};

use super::MarkId;
use crate::surface::DrawingSurface;

/// Font size of a sticker glyph at scale 1.0
pub const STICKER_FONT_SIZE: f32 = 32.0;

/// A glyph (usually an emoji) stamped onto the drawing
#[derive(Debug, Clone, PartialEq)]
pub struct StickerMark {
    id: MarkId,
    glyph: String,
    position: Pos2,
    scale: f32,
}

impl StickerMark {
    pub fn new(glyph: impl Into<String>, position: Pos2) -> Self {
        let glyph = glyph.into();
        debug_assert!(!glyph.is_empty(), "sticker glyph must not be empty");
        Self {
            id: MarkId::new(),
            glyph,
            position,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        debug_assert!(scale > 0.0, "sticker scale must be positive");
        self.scale = scale;
        self
    }

    pub fn id(&self) -> MarkId {
        self.id
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn font_size(&self) -> f32 {
        STICKER_FONT_SIZE * self.scale
    }

    pub(crate) fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(self.font_size()))
    }

    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        surface.draw_glyph(&self.glyph, self.position, self.font_size());
    }
}
