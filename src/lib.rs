#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod components;
pub mod controller;
pub mod element;
pub mod error;
pub mod export;
pub mod history;
pub mod input;
pub mod panels;
pub mod preview;
pub mod renderer;
pub mod settings;
pub mod surface;

pub use app::PaintApp;
pub use canvas::{Canvas, CanvasEvent, Dispatched};
pub use controller::{InteractionController, InteractionState, PointerEvent, ToolSelection};
pub use element::{Mark, MarkId, Point, StickerMark, StrokeMark};
pub use error::{CanvasError, MarkError, SettingsError};
pub use history::{DocumentHistory, HistoryReport};
pub use preview::PreviewOverlay;
pub use renderer::Renderer;
pub use settings::Settings;
pub use surface::{DisplayList, DrawingSurface, SurfaceOp};
