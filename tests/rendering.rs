use std::cell::Cell;
use std::rc::Rc;

use egui::{Color32, Vec2, pos2};
use image::Rgba;
use sticker_sketch::{
    Canvas, CanvasEvent, DisplayList, Mark, PointerEvent, Settings, SurfaceOp, ToolSelection,
};

fn canvas() -> Canvas<DisplayList> {
    let settings = Settings::default();
    Canvas::new(DisplayList::new(settings.canvas_size()), &settings).unwrap()
}

fn pointer(canvas: &mut Canvas<DisplayList>, event: PointerEvent) {
    canvas.dispatch(CanvasEvent::Pointer(event)).unwrap();
}

#[test]
fn test_new_canvas_paints_blank_background() {
    let canvas = canvas();
    assert_eq!(canvas.surface().ops(), &[SurfaceOp::FillBackground(Color32::WHITE)]);
}

#[test]
fn test_stroke_path_visits_points_in_order() {
    let mut mark = Mark::stroke(pos2(5.0, 5.0), 1.0);
    mark.extend(pos2(10.0, 5.0)).unwrap();
    mark.extend(pos2(10.0, 10.0)).unwrap();

    let mut surface = DisplayList::new(Vec2::splat(32.0));
    mark.render(&mut surface);
    let paths: Vec<_> = surface.stroke_paths().collect();
    assert_eq!(
        paths,
        vec![(&[pos2(5.0, 5.0), pos2(10.0, 5.0), pos2(10.0, 10.0)][..], 1.0)]
    );
}

#[test]
fn test_repaint_is_idempotent() {
    let mut canvas = canvas();
    pointer(&mut canvas, PointerEvent::Press(pos2(1.0, 1.0)));
    pointer(&mut canvas, PointerEvent::Move(pos2(9.0, 9.0)));
    pointer(&mut canvas, PointerEvent::Release(pos2(9.0, 9.0)));
    canvas
        .dispatch(CanvasEvent::SelectTool(ToolSelection::sticker("🎨")))
        .unwrap();
    pointer(&mut canvas, PointerEvent::Move(pos2(40.0, 40.0)));

    canvas.repaint();
    let first = canvas.surface().ops().to_vec();
    canvas.repaint();
    assert_eq!(canvas.surface().ops(), first.as_slice());
    assert_eq!(first.len(), 3);
}

#[test]
fn test_surface_tracks_every_event() {
    let mut canvas = canvas();
    pointer(&mut canvas, PointerEvent::Press(pos2(1.0, 1.0)));
    pointer(&mut canvas, PointerEvent::Move(pos2(5.0, 1.0)));

    // The in-progress stroke is visible before it is committed
    let paths: Vec<_> = canvas.surface().stroke_paths().collect();
    assert_eq!(paths.len(), 1);

    canvas.dispatch(CanvasEvent::Undo).unwrap();
    assert_eq!(canvas.surface().stroke_paths().count(), 0);
}

#[test]
fn test_no_preview_while_dragging_sticker() {
    let mut canvas = canvas();
    canvas
        .dispatch(CanvasEvent::SelectTool(ToolSelection::sticker("😀")))
        .unwrap();
    pointer(&mut canvas, PointerEvent::Move(pos2(20.0, 20.0)));
    pointer(&mut canvas, PointerEvent::Press(pos2(20.0, 20.0)));
    pointer(&mut canvas, PointerEvent::Move(pos2(30.0, 30.0)));

    // Only the committed sticker is drawn, once
    let glyphs: Vec<_> = canvas.surface().glyphs().collect();
    assert_eq!(glyphs.len(), 1);
    assert_eq!(glyphs[0].1, pos2(30.0, 30.0));
}

#[test]
fn test_redraw_hook_runs_only_on_redraw() {
    let mut canvas = canvas();
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    canvas.set_redraw_hook(move || seen.set(seen.get() + 1));

    pointer(&mut canvas, PointerEvent::Move(pos2(3.0, 3.0)));
    assert_eq!(count.get(), 1);

    // Nothing to undo, nothing to redraw
    canvas.dispatch(CanvasEvent::Undo).unwrap();
    assert_eq!(count.get(), 1);

    pointer(&mut canvas, PointerEvent::Release(pos2(3.0, 3.0)));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_export_scales_committed_marks_only() {
    let mut canvas = canvas();
    pointer(&mut canvas, PointerEvent::Press(pos2(10.0, 10.0)));
    pointer(&mut canvas, PointerEvent::Move(pos2(50.0, 10.0)));
    pointer(&mut canvas, PointerEvent::Release(pos2(50.0, 10.0)));

    // Still being drawn, so not exported
    pointer(&mut canvas, PointerEvent::Press(pos2(10.0, 100.0)));
    pointer(&mut canvas, PointerEvent::Move(pos2(50.0, 100.0)));

    let image = canvas.export(4.0).unwrap();
    assert_eq!((image.width(), image.height()), (1024, 1024));

    let black = Rgba([0, 0, 0, 255]);
    let white = Rgba([255, 255, 255, 255]);
    assert_eq!(*image.get_pixel(120, 40), black);
    assert_eq!(*image.get_pixel(120, 400), white);
    assert_eq!(*image.get_pixel(5, 5), white);
}

#[test]
fn test_export_event_returns_image_without_repainting() {
    let mut canvas = canvas();
    pointer(&mut canvas, PointerEvent::Press(pos2(10.0, 10.0)));
    pointer(&mut canvas, PointerEvent::Move(pos2(50.0, 10.0)));
    pointer(&mut canvas, PointerEvent::Release(pos2(50.0, 10.0)));

    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    canvas.set_redraw_hook(move || counter.set(counter.get() + 1));

    let dispatched = canvas.dispatch(CanvasEvent::Export { scale: 2.0 }).unwrap();
    assert_eq!(dispatched.report(), None);
    let image = dispatched.into_image().unwrap();
    assert_eq!((image.width(), image.height()), (512, 512));
    assert_eq!(count.get(), 0);
}

#[test]
fn test_oversized_export_event_fails_cleanly() {
    let mut canvas = canvas();
    assert!(matches!(
        canvas.dispatch(CanvasEvent::Export { scale: 100_000.0 }),
        Err(sticker_sketch::CanvasError::ExportTooLarge { .. })
    ));
    assert_eq!(canvas.state(), sticker_sketch::InteractionState::Idle);
}

#[test]
fn test_export_rejects_non_positive_scale() {
    let canvas = canvas();
    assert!(matches!(
        canvas.export(-1.0),
        Err(sticker_sketch::CanvasError::InvalidExportScale(_))
    ));
}
