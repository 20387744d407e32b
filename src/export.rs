//! Replaying a document onto an offscreen raster for export.
//!
//! The document is rendered through a [`ScaledSurface`] into an
//! [`ImageSurface`], which rasterizes the three drawing primitives into an
//! [`image::RgbaImage`]. Encoding the image is left to the caller.

use std::path::Path;

use egui::epaint::text::Fonts;
use egui::{Color32, FontDefinitions, FontId, Pos2, Vec2};
use image::{Rgba, RgbaImage};

use crate::element::Mark;
use crate::element::common::distance_to_line_segment;
use crate::error::CanvasError;
use crate::renderer::Renderer;
use crate::surface::DrawingSurface;

/// Largest glyph atlas the export font cache may allocate
const MAX_ATLAS_SIDE: usize = 8 * 1024;

/// Largest width or height of an exported image, in pixels
pub const MAX_EXPORT_SIDE: f32 = 8192.0;

/// Forwards every primitive to an inner surface with coordinates, widths and
/// font sizes multiplied by a constant factor
pub struct ScaledSurface<'a> {
    inner: &'a mut dyn DrawingSurface,
    scale: f32,
}

impl<'a> ScaledSurface<'a> {
    pub fn new(inner: &'a mut dyn DrawingSurface, scale: f32) -> Self {
        Self { inner, scale }
    }

    fn scale_point(&self, point: Pos2) -> Pos2 {
        Pos2::new(point.x * self.scale, point.y * self.scale)
    }
}

impl DrawingSurface for ScaledSurface<'_> {
    fn size(&self) -> Vec2 {
        self.inner.size() / self.scale
    }

    fn fill_background(&mut self, color: Color32) {
        self.inner.fill_background(color);
    }

    fn stroke_path(&mut self, points: &[Pos2], width: f32) {
        let points: Vec<Pos2> = points.iter().map(|p| self.scale_point(*p)).collect();
        self.inner.stroke_path(&points, width * self.scale);
    }

    fn draw_glyph(&mut self, glyph: &str, center: Pos2, font_size: f32) {
        let center = self.scale_point(center);
        self.inner.draw_glyph(glyph, center, font_size * self.scale);
    }
}

/// A software raster backed by an [`RgbaImage`]
pub struct ImageSurface {
    image: RgbaImage,
    ink: Color32,
    // Loaded on the first glyph; strokes alone never need fonts
    fonts: Option<Fonts>,
}

impl std::fmt::Debug for ImageSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSurface")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("ink", &self.ink)
            .field("fonts_loaded", &self.fonts.is_some())
            .finish()
    }
}

impl ImageSurface {
    pub fn new(width: u32, height: u32, ink: Color32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            ink,
            fonts: None,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Blend the ink color into pixel (x, y) with the given coverage
    fn blend(&mut self, x: i64, y: i64, coverage: f32) {
        if coverage <= 0.0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }

        let [ir, ig, ib, ia] = self.ink.to_srgba_unmultiplied();
        let alpha = coverage.min(1.0) * (ia as f32 / 255.0);
        let pixel = self.image.get_pixel_mut(x, y);
        let mix = |src: u8, dst: u8| -> u8 {
            (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8
        };
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = Rgba([
            mix(ir, r),
            mix(ig, g),
            mix(ib, b),
            a.max((alpha * 255.0).round() as u8),
        ]);
    }
}

impl DrawingSurface for ImageSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }

    fn fill_background(&mut self, color: Color32) {
        let fill = Rgba(color.to_srgba_unmultiplied());
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn stroke_path(&mut self, points: &[Pos2], width: f32) {
        if points.len() < 2 {
            return;
        }
        let radius = width / 2.0;

        // Coverage is accumulated per pixel as the max over all segments so
        // joints are not blended twice
        let (min, max) = points.iter().fold(
            (Pos2::new(f32::INFINITY, f32::INFINITY), Pos2::new(f32::NEG_INFINITY, f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        let x0 = ((min.x - radius - 1.0).floor() as i64).max(0);
        let y0 = ((min.y - radius - 1.0).floor() as i64).max(0);
        let x1 = ((max.x + radius + 1.0).ceil() as i64).min(self.image.width() as i64);
        let y1 = ((max.y + radius + 1.0).ceil() as i64).min(self.image.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let span = (x1 - x0) as usize;
        let mut coverage = vec![0.0_f32; span * (y1 - y0) as usize];
        for segment in points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let sx0 = ((a.x.min(b.x) - radius - 1.0).floor() as i64).max(x0);
            let sy0 = ((a.y.min(b.y) - radius - 1.0).floor() as i64).max(y0);
            let sx1 = ((a.x.max(b.x) + radius + 1.0).ceil() as i64).min(x1);
            let sy1 = ((a.y.max(b.y) + radius + 1.0).ceil() as i64).min(y1);
            for y in sy0..sy1 {
                for x in sx0..sx1 {
                    let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let d = distance_to_line_segment(center, a, b);
                    let c = (radius + 0.5 - d).clamp(0.0, 1.0);
                    let slot = &mut coverage[(y - y0) as usize * span + (x - x0) as usize];
                    *slot = slot.max(c);
                }
            }
        }

        for (i, c) in coverage.into_iter().enumerate() {
            let x = x0 + (i % span) as i64;
            let y = y0 + (i / span) as i64;
            self.blend(x, y, c);
        }
    }

    fn draw_glyph(&mut self, glyph: &str, center: Pos2, font_size: f32) {
        let fonts = self
            .fonts
            .get_or_insert_with(|| Fonts::new(1.0, MAX_ATLAS_SIDE, FontDefinitions::default()));
        let galley = fonts.layout_no_wrap(glyph.to_owned(), FontId::proportional(font_size), self.ink);
        let atlas = fonts.image();
        let origin = center - galley.size() / 2.0;

        let mut texels = Vec::new();
        for row in &galley.rows {
            for g in &row.glyphs {
                let uv = g.uv_rect;
                if uv.min == uv.max {
                    continue;
                }
                let left_top = origin + g.pos.to_vec2() + uv.offset;
                for ty in uv.min[1]..uv.max[1] {
                    for tx in uv.min[0]..uv.max[0] {
                        let c = atlas.pixels[ty as usize * atlas.size[0] + tx as usize];
                        let x = (left_top.x + (tx - uv.min[0]) as f32).round() as i64;
                        let y = (left_top.y + (ty - uv.min[1]) as f32).round() as i64;
                        texels.push((x, y, c));
                    }
                }
            }
        }

        if texels.is_empty() {
            log::warn!("No glyph available to export {glyph:?}");
        }
        for (x, y, c) in texels {
            self.blend(x, y, c);
        }
    }
}

/// Render `marks` onto a fresh image of `size * scale` pixels
pub fn export_marks(
    marks: &[Mark],
    size: Vec2,
    scale: f32,
    background: Color32,
    ink: Color32,
) -> Result<RgbaImage, CanvasError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CanvasError::InvalidExportScale(scale));
    }
    let width = (size.x * scale).round();
    let height = (size.y * scale).round();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(CanvasError::SurfaceUnavailable { width, height });
    }
    if width > MAX_EXPORT_SIDE || height > MAX_EXPORT_SIDE {
        log::error!("Refusing to export {width}x{height}");
        return Err(CanvasError::ExportTooLarge {
            width,
            height,
            max: MAX_EXPORT_SIDE,
        });
    }

    log::info!("Exporting {} marks at {}x{}", marks.len(), width, height);
    let mut target = ImageSurface::new(width as u32, height as u32, ink);
    let mut scaled = ScaledSurface::new(&mut target, scale);
    Renderer::new(background).render_document(&mut scaled, marks);
    Ok(target.into_image())
}

/// Encode an exported image, picking the format from the file extension
pub fn save_image(image: &RgbaImage, path: impl AsRef<Path>) -> Result<(), CanvasError> {
    let path = path.as_ref();
    image.save(path)?;
    log::info!("Saved export to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, SurfaceOp};
    use egui::pos2;

    #[test]
    fn test_scaled_surface_scales_everything() {
        let mut list = DisplayList::new(Vec2::splat(400.0));
        let mut scaled = ScaledSurface::new(&mut list, 4.0);
        assert_eq!(scaled.size(), Vec2::splat(100.0));

        scaled.stroke_path(&[pos2(1.0, 2.0), pos2(3.0, 4.0)], 2.0);
        scaled.draw_glyph("😀", pos2(10.0, 10.0), 32.0);

        assert_eq!(
            list.ops(),
            &[
                SurfaceOp::StrokePath {
                    points: vec![pos2(4.0, 8.0), pos2(12.0, 16.0)],
                    width: 8.0,
                },
                SurfaceOp::Glyph {
                    glyph: "😀".to_owned(),
                    center: pos2(40.0, 40.0),
                    font_size: 128.0,
                },
            ]
        );
    }

    #[test]
    fn test_image_surface_strokes_pixels() {
        let mut surface = ImageSurface::new(20, 20, Color32::BLACK);
        surface.fill_background(Color32::WHITE);
        surface.stroke_path(&[pos2(2.0, 10.0), pos2(18.0, 10.0)], 4.0);

        let image = surface.into_image();
        assert_eq!(*image.get_pixel(10, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(10, 1), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_single_point_path_leaves_image_untouched() {
        let mut surface = ImageSurface::new(8, 8, Color32::BLACK);
        surface.fill_background(Color32::WHITE);
        surface.stroke_path(&[pos2(4.0, 4.0)], 4.0);
        assert!(surface.image().pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_image_surface_draws_glyphs() {
        let sticker = Mark::sticker("😀", pos2(32.0, 32.0));
        let image = export_marks(&[sticker], Vec2::splat(128.0), 1.0, Color32::WHITE, Color32::BLACK).unwrap();

        let white = Rgba([255, 255, 255, 255]);
        let inked = |x0: u32, y0: u32, x1: u32, y1: u32| {
            (y0..y1)
                .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                .filter(|&(x, y)| *image.get_pixel(x, y) != white)
                .count()
        };
        let near = inked(0, 0, 72, 72);
        assert!(near > 0);
        assert_eq!(inked(0, 0, 128, 128), near);
        assert_eq!(*image.get_pixel(120, 120), white);
    }

    #[test]
    fn test_export_rejects_oversized_image() {
        let result = export_marks(&[], Vec2::splat(256.0), 100_000.0, Color32::WHITE, Color32::BLACK);
        assert!(matches!(result, Err(CanvasError::ExportTooLarge { .. })));

        // Exactly at the limit is fine
        let image = export_marks(&[], Vec2::new(1.0, 256.0), 32.0, Color32::WHITE, Color32::BLACK).unwrap();
        assert_eq!(image.height(), MAX_EXPORT_SIDE as u32);
    }

    #[test]
    fn test_export_rejects_bad_scale() {
        let size = Vec2::splat(10.0);
        assert!(matches!(
            export_marks(&[], size, 0.0, Color32::WHITE, Color32::BLACK),
            Err(CanvasError::InvalidExportScale(_))
        ));
        assert!(matches!(
            export_marks(&[], size, f32::NAN, Color32::WHITE, Color32::BLACK),
            Err(CanvasError::InvalidExportScale(_))
        ));
    }
}
