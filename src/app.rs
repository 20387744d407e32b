use crate::canvas::{Canvas, CanvasEvent, Dispatched};
use crate::controller::ToolSelection;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::settings::Settings;
use crate::surface::DisplayList;

pub const APP_NAME: &str = "LT Paint";

/// Storage key for the persisted settings
const SETTINGS_KEY: &str = "sticker_sketch/settings";

/// The eframe shell around a [`Canvas`]: toolbar, canvas area and persistence
/// of the settings (never the drawing).
pub struct PaintApp {
    /// `None` when the drawing surface could not be created
    canvas: Option<Canvas<DisplayList>>,
    input: InputHandler,
    settings: Settings,
    custom_sticker: String,
    status: Option<String>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value::<Settings>(storage, SETTINGS_KEY))
            .filter(|settings| match settings.validate() {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("Ignoring stored settings: {err}");
                    false
                }
            })
            .unwrap_or_default();

        let mut app = Self::with_settings(settings);
        if let Some(canvas) = &mut app.canvas {
            let ctx = cc.egui_ctx.clone();
            canvas.set_redraw_hook(move || ctx.request_repaint());
        }
        app
    }

    pub fn with_settings(settings: Settings) -> Self {
        let surface = DisplayList::new(settings.canvas_size());
        let canvas = match Canvas::new(surface, &settings) {
            Ok(canvas) => Some(canvas),
            Err(err) => {
                log::error!("Cannot create canvas: {err}");
                None
            }
        };

        Self {
            canvas,
            input: InputHandler::new(),
            settings,
            custom_sticker: String::new(),
            status: None,
        }
    }

    pub fn canvas(&self) -> Option<&Canvas<DisplayList>> {
        self.canvas.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn custom_sticker_mut(&mut self) -> &mut String {
        &mut self.custom_sticker
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Forward an event to the canvas, logging instead of failing
    pub fn dispatch(&mut self, event: CanvasEvent) -> Option<Dispatched> {
        let Some(canvas) = &mut self.canvas else {
            log::warn!("No canvas, dropping {event:?}");
            return None;
        };

        match canvas.dispatch(event) {
            Ok(dispatched) => {
                if let Some(report) = dispatched.report() {
                    log::debug!("History: {report:?}");
                }
                Some(dispatched)
            }
            Err(err) => {
                log::error!("{err}");
                self.status = Some(err.to_string());
                None
            }
        }
    }

    pub fn select_tool(&mut self, tool: ToolSelection) {
        self.dispatch(CanvasEvent::SelectTool(tool));
    }

    /// Add the text in the custom sticker box to the palette and select it
    pub fn add_custom_sticker(&mut self) {
        match self.settings.add_sticker(&self.custom_sticker) {
            Ok(glyph) => {
                self.custom_sticker.clear();
                self.select_tool(ToolSelection::sticker(glyph));
            }
            Err(err) => {
                log::warn!("Custom sticker rejected: {err}");
                self.status = Some(err.to_string());
            }
        }
    }

    /// Render the document at the export scale and write it next to the binary
    pub fn export(&mut self) {
        let scale = self.settings.export_scale;
        let Some(image) = self
            .dispatch(CanvasEvent::Export { scale })
            .and_then(Dispatched::into_image)
        else {
            return;
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.status = Some(match crate::export::save_image(&image, &self.settings.export_file_name) {
                Ok(()) => format!(
                    "Exported {}x{} to {}",
                    image.width(),
                    image.height(),
                    self.settings.export_file_name
                ),
                Err(err) => {
                    log::error!("Export failed: {err}");
                    format!("Export failed: {err}")
                }
            });
        }

        #[cfg(target_arch = "wasm32")]
        {
            log::warn!("Saving files is not supported on the web");
            self.status = Some(format!("Rendered {}x{}, saving unsupported here", image.width(), image.height()));
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SETTINGS_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
