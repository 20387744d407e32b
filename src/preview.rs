use egui::Pos2;
use std::f32::consts::TAU;

use crate::element::STICKER_FONT_SIZE;
use crate::surface::DrawingSurface;

/// Segments used to approximate the brush ring
const RING_SEGMENTS: usize = 32;
/// Width of the ring outline
const RING_OUTLINE_WIDTH: f32 = 1.0;
/// Smallest ring drawn, so thin brushes still show a cursor
const MIN_RING_RADIUS: f32 = 1.0;

/// A transient hint that follows the pointer and is never part of the document
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOverlay {
    /// Outline showing how wide the next stroke will be
    Ring { center: Pos2, radius: f32 },
    /// The sticker that a press would place
    Sticker {
        glyph: String,
        position: Pos2,
        scale: f32,
    },
}

impl PreviewOverlay {
    /// Ring preview for a brush of the given line width
    pub fn ring(center: Pos2, line_width: f32) -> Self {
        Self::Ring {
            center,
            radius: (line_width / 2.0).max(MIN_RING_RADIUS),
        }
    }

    pub fn sticker(glyph: impl Into<String>, position: Pos2) -> Self {
        Self::Sticker {
            glyph: glyph.into(),
            position,
            scale: 1.0,
        }
    }

    /// Follow the pointer, keeping the tool parameters
    pub fn move_to(&mut self, pos: Pos2) {
        match self {
            Self::Ring { center, .. } => *center = pos,
            Self::Sticker { position, .. } => *position = pos,
        }
    }

    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        match self {
            Self::Ring { center, radius } => {
                let ring: Vec<Pos2> = (0..=RING_SEGMENTS)
                    .map(|i| {
                        let angle = TAU * i as f32 / RING_SEGMENTS as f32;
                        Pos2::new(
                            center.x + radius * angle.cos(),
                            center.y + radius * angle.sin(),
                        )
                    })
                    .collect();
                surface.stroke_path(&ring, RING_OUTLINE_WIDTH);
            }
            Self::Sticker {
                glyph,
                position,
                scale,
            } => {
                surface.draw_glyph(glyph, *position, STICKER_FONT_SIZE * scale);
            }
        }
    }
}
