use egui::Color32;
use image::RgbaImage;

use crate::controller::{InteractionController, InteractionState, Outcome, PointerEvent, ToolSelection};
use crate::error::CanvasError;
use crate::export;
use crate::history::{DocumentHistory, HistoryReport};
use crate::preview::PreviewOverlay;
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::surface::{DisplayList, DrawingSurface};

/// Everything the host can ask of the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    Pointer(PointerEvent),
    SelectTool(ToolSelection),
    Clear,
    Undo,
    Redo,
    /// Render the committed document at `scale` times the surface size
    Export { scale: f32 },
}

/// What handling a [`CanvasEvent`] produced
#[derive(Debug, Default)]
pub enum Dispatched {
    /// Pointer and tool events
    #[default]
    Handled,
    /// Undo, redo and clear
    History(HistoryReport),
    Exported(RgbaImage),
}

impl Dispatched {
    pub fn report(&self) -> Option<HistoryReport> {
        match self {
            Self::History(report) => Some(*report),
            Self::Handled | Self::Exported(_) => None,
        }
    }

    pub fn into_image(self) -> Option<RgbaImage> {
        match self {
            Self::Exported(image) => Some(image),
            Self::Handled | Self::History(_) => None,
        }
    }
}

/// The drawing application state: document history, interaction state and the
/// surface they are rendered onto.
///
/// Events are handled synchronously. When an event asks for a redraw, the
/// surface is repainted before [`Canvas::dispatch`] returns, so the surface
/// always reflects the state left by the most recent event.
pub struct Canvas<S: DrawingSurface = DisplayList> {
    surface: S,
    history: DocumentHistory,
    controller: InteractionController,
    renderer: Renderer,
    ink: Color32,
    redraw_hook: Option<Box<dyn FnMut()>>,
}

impl<S: DrawingSurface> std::fmt::Debug for Canvas<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("state", &self.controller.state())
            .field("tool", self.controller.tool())
            .field("committed", &self.history.len())
            .field("redoable", &self.history.redo_buffer().len())
            .field("redraw_hook", &self.redraw_hook.is_some())
            .finish()
    }
}

impl<S: DrawingSurface> Canvas<S> {
    /// Build a canvas on top of `surface`.
    ///
    /// Fails when the surface reports itself unavailable. The surface is
    /// painted once with the empty document.
    pub fn new(surface: S, settings: &Settings) -> Result<Self, CanvasError> {
        if !surface.is_available() {
            let size = surface.size();
            log::error!("Drawing surface unavailable: {size:?}");
            return Err(CanvasError::SurfaceUnavailable {
                width: size.x,
                height: size.y,
            });
        }

        let mut canvas = Self {
            surface,
            history: DocumentHistory::new(),
            controller: InteractionController::new(settings.default_tool()),
            renderer: Renderer::new(settings.background_color()),
            ink: settings.ink_color(),
            redraw_hook: None,
        };
        canvas.repaint();
        Ok(canvas)
    }

    /// Called after every repaint, e.g. to ask the host window for a new frame
    pub fn set_redraw_hook(&mut self, hook: impl FnMut() + 'static) {
        self.redraw_hook = Some(Box::new(hook));
    }

    /// Handle one event to completion.
    ///
    /// Returns what happened to history for undo, redo and clear, and the
    /// image for export.
    pub fn dispatch(&mut self, event: CanvasEvent) -> Result<Dispatched, CanvasError> {
        let outcome: Outcome = match event {
            CanvasEvent::Pointer(pointer) => {
                match self.controller.handle_pointer(pointer, &mut self.history) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        log::error!("Aborted {pointer:?}: {err}");
                        return Err(err.into());
                    }
                }
            }
            CanvasEvent::SelectTool(tool) => self.controller.select_tool(tool),
            CanvasEvent::Clear => self.controller.clear(&mut self.history),
            CanvasEvent::Undo => self.controller.undo(&mut self.history),
            CanvasEvent::Redo => self.controller.redo(&mut self.history),
            CanvasEvent::Export { scale } => return self.export(scale).map(Dispatched::Exported),
        };

        if outcome.redraw {
            self.repaint();
        }
        Ok(outcome.report.map_or(Dispatched::Handled, Dispatched::History))
    }

    /// Full repaint of the surface from current state
    pub fn repaint(&mut self) {
        self.renderer
            .repaint(&mut self.surface, &self.history, &self.controller);
        if let Some(hook) = &mut self.redraw_hook {
            hook();
        }
    }

    /// Render the committed document at `scale` times the surface size
    pub fn export(&self, scale: f32) -> Result<RgbaImage, CanvasError> {
        export::export_marks(
            self.history.committed(),
            self.surface.size(),
            scale,
            self.renderer.background(),
            self.ink,
        )
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn history(&self) -> &DocumentHistory {
        &self.history
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn tool(&self) -> &ToolSelection {
        self.controller.tool()
    }

    pub fn preview(&self) -> Option<&PreviewOverlay> {
        self.controller.preview()
    }

    pub fn ink(&self) -> Color32 {
        self.ink
    }
}
