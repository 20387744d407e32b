use egui::{Context, Pos2, Rect};

use crate::controller::PointerEvent;

/// The pointer as seen during one frame, in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// `None` when the pointer is not over the canvas
    pub pos: Option<Pos2>,
    /// The primary button went down this frame
    pub pressed: bool,
    /// The primary button went up this frame
    pub released: bool,
}

impl PointerSample {
    /// Read the pointer from egui, relative to `canvas_rect`
    pub fn from_egui(ctx: &Context, canvas_rect: Rect) -> Self {
        ctx.input(|input| Self {
            pos: input
                .pointer
                .hover_pos()
                .filter(|pos| canvas_rect.contains(*pos))
                .map(|pos| (pos - canvas_rect.min).to_pos2()),
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
        })
    }
}

/// Turns per-frame pointer samples into the press/move/release/leave stream
/// the canvas understands
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, sample: PointerSample) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        match sample.pos {
            Some(pos) => {
                if self.last_pointer_pos != Some(pos) {
                    events.push(PointerEvent::Move(pos));
                }
                if sample.pressed {
                    events.push(PointerEvent::Press(pos));
                }
                if sample.released {
                    events.push(PointerEvent::Release(pos));
                }
                self.last_pointer_pos = Some(pos);
            }
            None => {
                // Presses and releases off the canvas are not ours
                if let Some(last) = self.last_pointer_pos.take() {
                    events.push(PointerEvent::Leave(last));
                }
            }
        }

        events
    }
}
