use thiserror::Error;

/// Errors raised by a single mark when asked to do something its variant
/// cannot do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkError {
    /// Extending a sticker or repositioning a stroke
    #[error("invalid operation: cannot {operation} a {kind} mark")]
    InvalidOperation {
        operation: &'static str,
        kind: &'static str,
    },
}

/// Errors that can occur while driving the canvas
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error(transparent)]
    InvalidOperation(#[from] MarkError),

    #[error("drawing surface unavailable ({width}x{height})")]
    SurfaceUnavailable { width: f32, height: f32 },

    #[error("export scale must be positive and finite, got {0}")]
    InvalidExportScale(f32),

    #[error("export of {width}x{height} exceeds the {max} pixel limit")]
    ExportTooLarge { width: f32, height: f32, max: f32 },

    #[error("failed to export image: {0}")]
    Export(#[from] image::ImageError),
}

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
