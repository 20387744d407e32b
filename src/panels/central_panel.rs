use crate::PaintApp;
use crate::canvas::CanvasEvent;
use crate::input::PointerSample;
use crate::surface::DrawingSurface;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(size) = app.canvas().map(|canvas| canvas.surface().size()) else {
            ui.label("Drawing surface unavailable");
            return;
        };

        let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
        let canvas_rect = response.rect;

        // Feed pointer input through the canvas before painting it
        let sample = PointerSample::from_egui(ctx, canvas_rect);
        for event in app.input_mut().process(sample) {
            app.dispatch(CanvasEvent::Pointer(event));
        }

        if let Some(canvas) = app.canvas() {
            canvas.surface().paint(&painter, canvas_rect.min, canvas.ink());
        }
    });
}
