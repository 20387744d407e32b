use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use crate::controller::ToolSelection;
use crate::error::SettingsError;
use crate::export::MAX_EXPORT_SIDE;

pub const DEFAULT_THIN_WIDTH: f32 = 2.0;
pub const DEFAULT_THICK_WIDTH: f32 = 6.0;

/// A named pen width offered in the toolbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPreset {
    pub name: String,
    pub line_width: f32,
}

impl MarkerPreset {
    pub fn new(name: impl Into<String>, line_width: f32) -> Self {
        Self {
            name: name.into(),
            line_width,
        }
    }
}

/// User-facing configuration.
///
/// Persisted through eframe storage between runs. The drawing itself is never
/// part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old settings
pub struct Settings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Unmultiplied RGBA
    pub background: [u8; 4],
    /// Unmultiplied RGBA used for strokes, glyphs and previews
    pub ink: [u8; 4],
    pub markers: Vec<MarkerPreset>,
    pub stickers: Vec<String>,
    /// Factor applied to the canvas size when exporting
    pub export_scale: f32,
    pub export_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 256.0,
            canvas_height: 256.0,
            background: [255, 255, 255, 255],
            ink: [0, 0, 0, 255],
            markers: vec![
                MarkerPreset::new("Thin", DEFAULT_THIN_WIDTH),
                MarkerPreset::new("Thick", DEFAULT_THICK_WIDTH),
            ],
            stickers: vec!["😀".to_owned(), "🎨".to_owned(), "⭐".to_owned()],
            export_scale: 4.0,
            export_file_name: "sketch.png".to_owned(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !is_positive(self.canvas_width) || !is_positive(self.canvas_height) {
            return Err(SettingsError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !is_positive(self.export_scale) {
            return Err(SettingsError::Invalid(format!(
                "export scale must be positive, got {}",
                self.export_scale
            )));
        }
        let export_side = self.canvas_width.max(self.canvas_height) * self.export_scale;
        if export_side.round() > MAX_EXPORT_SIDE {
            return Err(SettingsError::Invalid(format!(
                "export of {export_side} pixels exceeds the {MAX_EXPORT_SIDE} pixel limit"
            )));
        }
        if let Some(marker) = self.markers.iter().find(|m| !is_positive(m.line_width)) {
            return Err(SettingsError::Invalid(format!(
                "marker {:?} has non-positive width {}",
                marker.name, marker.line_width
            )));
        }
        if self.stickers.iter().any(|glyph| glyph.trim().is_empty()) {
            return Err(SettingsError::Invalid("sticker glyphs must not be empty".to_owned()));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(SettingsError::Invalid("export file name must not be empty".to_owned()));
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    pub fn background_color(&self) -> Color32 {
        let [r, g, b, a] = self.background;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn ink_color(&self) -> Color32 {
        let [r, g, b, a] = self.ink;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    /// The tool selected at startup: the first marker, else the first sticker
    pub fn default_tool(&self) -> ToolSelection {
        if let Some(marker) = self.markers.first() {
            ToolSelection::freehand(marker.line_width)
        } else if let Some(glyph) = self.stickers.first() {
            ToolSelection::sticker(glyph.clone())
        } else {
            ToolSelection::freehand(DEFAULT_THIN_WIDTH)
        }
    }

    /// Add a custom sticker to the palette.
    ///
    /// Returns the trimmed glyph; adding one that already exists is not an error.
    pub fn add_sticker(&mut self, glyph: &str) -> Result<String, SettingsError> {
        let glyph = glyph.trim();
        if glyph.is_empty() {
            return Err(SettingsError::Invalid("sticker glyph must not be empty".to_owned()));
        }
        if !self.stickers.iter().any(|s| s == glyph) {
            log::info!("Adding custom sticker {glyph}");
            self.stickers.push(glyph.to_owned());
        }
        Ok(glyph.to_owned())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
