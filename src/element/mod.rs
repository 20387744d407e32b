//! Marks: the units of drawn content in a document.
//!
//! A mark is either a freehand [`StrokeMark`] or a placed [`StickerMark`].
//! Strokes grow point by point while they are being drawn; stickers are
//! placed whole and may only be moved while they are being dragged.

use egui::{Pos2, Rect};
use uuid::Uuid;

pub(crate) mod common;
mod sticker;
mod stroke;

pub use sticker::{STICKER_FONT_SIZE, StickerMark};
pub use stroke::StrokeMark;

use crate::error::MarkError;
use crate::surface::DrawingSurface;

/// A position in surface-local pixels
pub type Point = Pos2;

/// Identity of a mark, stable across undo and redo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkId(Uuid);

impl MarkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One drawable unit of the document
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Stroke(StrokeMark),
    Sticker(StickerMark),
}

impl Mark {
    /// Start a new stroke at `anchor`
    pub fn stroke(anchor: Point, line_width: f32) -> Self {
        Mark::Stroke(StrokeMark::new(anchor, line_width))
    }

    /// Place a new sticker at `position` with the default scale
    pub fn sticker(glyph: impl Into<String>, position: Point) -> Self {
        Mark::Sticker(StickerMark::new(glyph, position))
    }

    pub fn id(&self) -> MarkId {
        match self {
            Mark::Stroke(s) => s.id(),
            Mark::Sticker(s) => s.id(),
        }
    }

    /// Get the mark type as a string
    pub fn kind(&self) -> &'static str {
        match self {
            Mark::Stroke(_) => "stroke",
            Mark::Sticker(_) => "sticker",
        }
    }

    /// Bounding rectangle of everything the mark paints
    pub fn bounds(&self) -> Rect {
        match self {
            Mark::Stroke(s) => s.bounds(),
            Mark::Sticker(s) => s.bounds(),
        }
    }

    /// Append a point to a stroke.
    ///
    /// Stickers do not accumulate points.
    pub fn extend(&mut self, point: Point) -> Result<(), MarkError> {
        match self {
            Mark::Stroke(s) => {
                s.push(point);
                Ok(())
            }
            Mark::Sticker(_) => Err(MarkError::InvalidOperation {
                operation: "extend",
                kind: "sticker",
            }),
        }
    }

    /// Move a sticker to `point`.
    ///
    /// Strokes cannot be repositioned.
    pub fn reposition(&mut self, point: Point) -> Result<(), MarkError> {
        match self {
            Mark::Sticker(s) => {
                s.set_position(point);
                Ok(())
            }
            Mark::Stroke(_) => Err(MarkError::InvalidOperation {
                operation: "reposition",
                kind: "stroke",
            }),
        }
    }

    /// Draw the mark from its own attributes only
    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        match self {
            Mark::Stroke(s) => s.render(surface),
            Mark::Sticker(s) => s.render(surface),
        }
    }

    pub fn as_stroke(&self) -> Option<&StrokeMark> {
        match self {
            Mark::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sticker(&self) -> Option<&StickerMark> {
        match self {
            Mark::Sticker(s) => Some(s),
            _ => None,
        }
    }
}

impl From<StrokeMark> for Mark {
    fn from(stroke: StrokeMark) -> Self {
        Mark::Stroke(stroke)
    }
}

impl From<StickerMark> for Mark {
    fn from(sticker: StickerMark) -> Self {
        Mark::Sticker(sticker)
    }
}
