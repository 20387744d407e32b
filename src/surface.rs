use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke as EguiStroke, Vec2};

/// The raster primitives the canvas draws with.
///
/// Implementations are synchronous: every call has taken effect when it returns.
pub trait DrawingSurface {
    /// Size of the drawable area in surface pixels
    fn size(&self) -> Vec2;

    /// Whether the surface can be drawn on at all.
    ///
    /// A canvas refuses to be built on top of a surface that reports `false`.
    fn is_available(&self) -> bool {
        let size = self.size();
        size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
    }

    /// Cover the whole surface with `color`, discarding everything drawn so far
    fn fill_background(&mut self, color: Color32);

    /// Stroke a path through `points` in order with round joins and caps
    fn stroke_path(&mut self, points: &[Pos2], width: f32);

    /// Draw `glyph` centered at `center` at the given font size
    fn draw_glyph(&mut self, glyph: &str, center: Pos2, font_size: f32);
}

/// One recorded drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    FillBackground(Color32),
    StrokePath { points: Vec<Pos2>, width: f32 },
    Glyph { glyph: String, center: Pos2, font_size: f32 },
}

/// A surface that records primitives instead of rasterizing them.
///
/// The canvas repaints into a `DisplayList` only when its state changes; the
/// host then blits the recorded ops into an [`egui::Painter`] every frame.
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Vec2,
    ops: Vec<SurfaceOp>,
}

impl DisplayList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Every stroked path in drawing order
    pub fn stroke_paths(&self) -> impl Iterator<Item = (&[Pos2], f32)> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::StrokePath { points, width } => Some((points.as_slice(), *width)),
            _ => None,
        })
    }

    /// Every glyph in drawing order
    pub fn glyphs(&self) -> impl Iterator<Item = (&str, Pos2, f32)> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Glyph {
                glyph,
                center,
                font_size,
            } => Some((glyph.as_str(), *center, *font_size)),
            _ => None,
        })
    }

    /// Replay the recorded ops onto an egui painter.
    ///
    /// `origin` is the screen position of the surface's top-left corner.
    pub fn paint(&self, painter: &Painter, origin: Pos2, ink: Color32) {
        let offset = origin.to_vec2();
        for op in &self.ops {
            match op {
                SurfaceOp::FillBackground(color) => {
                    painter.rect_filled(Rect::from_min_size(origin, self.size), 0.0, *color);
                }
                SurfaceOp::StrokePath { points, width } => {
                    let points: Vec<Pos2> = points.iter().map(|p| *p + offset).collect();
                    // egui lines have butt caps, so cap both ends by hand
                    let radius = width / 2.0;
                    if let (Some(first), Some(last)) = (points.first(), points.last()) {
                        painter.circle_filled(*first, radius, ink);
                        painter.circle_filled(*last, radius, ink);
                    }
                    painter.add(Shape::line(points, EguiStroke::new(*width, ink)));
                }
                SurfaceOp::Glyph {
                    glyph,
                    center,
                    font_size,
                } => {
                    painter.text(
                        *center + offset,
                        Align2::CENTER_CENTER,
                        glyph,
                        FontId::proportional(*font_size),
                        ink,
                    );
                }
            }
        }
    }
}

impl DrawingSurface for DisplayList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_background(&mut self, color: Color32) {
        self.ops.clear();
        self.ops.push(SurfaceOp::FillBackground(color));
    }

    fn stroke_path(&mut self, points: &[Pos2], width: f32) {
        self.ops.push(SurfaceOp::StrokePath {
            points: points.to_vec(),
            width,
        });
    }

    fn draw_glyph(&mut self, glyph: &str, center: Pos2, font_size: f32) {
        self.ops.push(SurfaceOp::Glyph {
            glyph: glyph.to_owned(),
            center,
            font_size,
        });
    }
}
