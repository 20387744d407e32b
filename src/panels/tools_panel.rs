use crate::PaintApp;
use crate::app::APP_NAME;
use crate::canvas::CanvasEvent;
use crate::components::tool_button::ToolButton;
use crate::controller::ToolSelection;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading(APP_NAME);
            ui.separator();

            let active_tool = app.canvas().map(|canvas| canvas.tool().clone());

            // Collect the palette first to avoid borrowing issues
            let markers = app.settings().markers.clone();
            let stickers = app.settings().stickers.clone();

            ui.label("Markers");
            ui.horizontal(|ui| {
                for marker in &markers {
                    let tool = ToolSelection::freehand(marker.line_width);
                    let selected = active_tool.as_ref() == Some(&tool);
                    let label = format!("{} ({}px)", marker.name, marker.line_width);
                    if ui.selectable_label(selected, label).clicked() {
                        log::info!("Marker selected from UI: {}", marker.name);
                        app.select_tool(tool);
                    }
                }
            });

            ui.label("Stickers");
            ui.horizontal_wrapped(|ui| {
                for glyph in &stickers {
                    let tool = ToolSelection::sticker(glyph.clone());
                    let selected = active_tool.as_ref() == Some(&tool);
                    if ToolButton::new(glyph, selected).show(ui).clicked() {
                        log::info!("Sticker selected from UI: {glyph}");
                        app.select_tool(tool);
                    }
                }
            });

            ui.horizontal(|ui| {
                let entry = ui.add(
                    egui::TextEdit::singleline(app.custom_sticker_mut())
                        .hint_text("Custom sticker")
                        .desired_width(100.0),
                );
                let submitted = entry.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add").clicked() || submitted {
                    app.add_custom_sticker();
                }
            });

            ui.separator();

            let (can_undo, can_redo, constructing) = app
                .canvas()
                .map(|canvas| {
                    (
                        canvas.history().can_undo(),
                        canvas.history().can_redo(),
                        canvas.controller().is_constructing(),
                    )
                })
                .unwrap_or_default();

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(can_undo || constructing, egui::Button::new("Undo"))
                    .clicked()
                {
                    app.dispatch(CanvasEvent::Undo);
                }
                if ui
                    .add_enabled(can_redo || constructing, egui::Button::new("Redo"))
                    .clicked()
                {
                    app.dispatch(CanvasEvent::Redo);
                }
                if ui.button("Clear").clicked() {
                    app.dispatch(CanvasEvent::Clear);
                }
            });

            if ui.button("Export").clicked() {
                app.export();
            }

            ui.separator();

            if let Some(canvas) = app.canvas() {
                ui.label(format!("Marks: {}", canvas.history().len()));
                ui.label(format!("Redo stack size: {}", canvas.history().redo_buffer().len()));
                ui.label(format!("State: {:?}", canvas.state()));
            }
            if let Some(status) = app.status() {
                ui.label(status);
            }
        });
}
