//! The pointer-driven state machine that builds marks.
//!
//! # State Transitions
//!
//! ```text
//!                  press (freehand)        release / leave
//!  ┌──────────┐ ─────────────────────► ┌───────────────┐ ──────────────┐
//!  │   Idle   │                        │ DrawingStroke │               │
//!  │          │ ◄──────────────────────┴───────────────┘ ◄─────────────┘
//!  └────┬─────┘           (commit stroke)
//!       │ ▲ select tool
//!       ▼ │
//!  ┌──────────────────┐   press (sticker)   ┌─────────────────┐
//!  │  PlacingSticker  │ ──────────────────► │ DraggingSticker │
//!  │                  │ ◄────────────────── │                 │
//!  └──────────────────┘   release / leave   └─────────────────┘
//! ```
//!
//! `Idle` and `PlacingSticker` are the two resting states; which one applies
//! depends only on the selected tool. While resting, pointer movement drives
//! the [`PreviewOverlay`]. Stickers are committed on press and then moved in
//! place, so a drag never duplicates a mark.

use egui::Pos2;

use crate::element::{Mark, MarkId};
use crate::error::MarkError;
use crate::history::{DocumentHistory, HistoryReport};
use crate::preview::PreviewOverlay;

/// The tool that decides what a press creates
#[derive(Debug, Clone, PartialEq)]
pub enum ToolSelection {
    /// Freehand pen with a fixed line width
    Freehand { line_width: f32 },
    /// Sticker stamp with the given glyph
    Sticker { glyph: String },
}

impl ToolSelection {
    pub fn freehand(line_width: f32) -> Self {
        Self::Freehand { line_width }
    }

    pub fn sticker(glyph: impl Into<String>) -> Self {
        Self::Sticker {
            glyph: glyph.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Freehand { .. } => "Freehand",
            Self::Sticker { .. } => "Sticker",
        }
    }

    fn preview_at(&self, pos: Pos2) -> PreviewOverlay {
        match self {
            Self::Freehand { line_width } => PreviewOverlay::ring(pos, *line_width),
            Self::Sticker { glyph } => PreviewOverlay::sticker(glyph.clone(), pos),
        }
    }
}

/// Pointer input in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Pos2),
    Move(Pos2),
    Release(Pos2),
    /// The pointer left the surface; carries the last known position
    Leave(Pos2),
}

/// The named states of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    DrawingStroke,
    DraggingSticker,
    PlacingSticker,
}

/// Internal state, carrying whatever is under construction
#[derive(Debug, Clone)]
enum Phase {
    Idle,
    PlacingSticker,
    /// The stroke is owned here until it is committed
    DrawingStroke(Mark),
    /// The sticker is already committed; only its id is held
    DraggingSticker(MarkId),
}

/// What handling an event asked of the rest of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub redraw: bool,
    pub report: Option<HistoryReport>,
}

impl Outcome {
    fn none() -> Self {
        Self::default()
    }

    fn redraw() -> Self {
        Self {
            redraw: true,
            report: None,
        }
    }

    fn report(report: HistoryReport) -> Self {
        Self {
            redraw: report.changed_anything(),
            report: Some(report),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    tool: ToolSelection,
    phase: Phase,
    preview: Option<PreviewOverlay>,
}

impl InteractionController {
    pub fn new(tool: ToolSelection) -> Self {
        let phase = resting_phase(&tool);
        Self {
            tool,
            phase,
            preview: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        match self.phase {
            Phase::Idle => InteractionState::Idle,
            Phase::PlacingSticker => InteractionState::PlacingSticker,
            Phase::DrawingStroke(_) => InteractionState::DrawingStroke,
            Phase::DraggingSticker(_) => InteractionState::DraggingSticker,
        }
    }

    pub fn tool(&self) -> &ToolSelection {
        &self.tool
    }

    pub fn preview(&self) -> Option<&PreviewOverlay> {
        self.preview.as_ref()
    }

    /// The stroke currently being drawn, not yet part of the document
    pub fn in_progress(&self) -> Option<&Mark> {
        match &self.phase {
            Phase::DrawingStroke(mark) => Some(mark),
            _ => None,
        }
    }

    /// The committed sticker currently being dragged
    pub fn dragged_sticker(&self) -> Option<MarkId> {
        match self.phase {
            Phase::DraggingSticker(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_constructing(&self) -> bool {
        matches!(
            self.phase,
            Phase::DrawingStroke(_) | Phase::DraggingSticker(_)
        )
    }

    /// Feed one pointer event through the state machine.
    ///
    /// A mark refusing an operation aborts the event and leaves the state as it was.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        history: &mut DocumentHistory,
    ) -> Result<Outcome, MarkError> {
        match event {
            PointerEvent::Press(pos) => Ok(self.on_press(pos, history)),
            PointerEvent::Move(pos) => self.on_move(pos, history),
            PointerEvent::Release(_) | PointerEvent::Leave(_) => Ok(self.on_finish(event, history)),
        }
    }

    fn on_press(&mut self, pos: Pos2, history: &mut DocumentHistory) -> Outcome {
        if self.is_constructing() {
            log::warn!("Ignoring press at {pos:?} while {:?}", self.state());
            return Outcome::none();
        }

        self.preview = None;
        match &self.tool {
            ToolSelection::Freehand { line_width } => {
                log::debug!("Starting stroke at {pos:?} with width {line_width}");
                self.phase = Phase::DrawingStroke(Mark::stroke(pos, *line_width));
            }
            ToolSelection::Sticker { glyph } => {
                // Stickers are placed whole; the drag only moves them
                let sticker = Mark::sticker(glyph.clone(), pos);
                let id = sticker.id();
                log::debug!("Placing sticker {glyph} at {pos:?}");
                history.commit(sticker);
                self.phase = Phase::DraggingSticker(id);
            }
        }
        Outcome::redraw()
    }

    fn on_move(&mut self, pos: Pos2, history: &mut DocumentHistory) -> Result<Outcome, MarkError> {
        match &mut self.phase {
            Phase::DrawingStroke(mark) => {
                mark.extend(pos)?;
                Ok(Outcome::redraw())
            }
            Phase::DraggingSticker(id) => match history.mark_mut(*id) {
                Some(mark) => {
                    mark.reposition(pos)?;
                    Ok(Outcome::redraw())
                }
                None => {
                    log::warn!("Dragged sticker {id} is no longer committed, ending drag");
                    self.phase = resting_phase(&self.tool);
                    Ok(Outcome::redraw())
                }
            },
            Phase::Idle | Phase::PlacingSticker => {
                match &mut self.preview {
                    Some(preview) => preview.move_to(pos),
                    None => self.preview = Some(self.tool.preview_at(pos)),
                }
                Ok(Outcome::redraw())
            }
        }
    }

    fn on_finish(&mut self, event: PointerEvent, history: &mut DocumentHistory) -> Outcome {
        let rest = resting_phase(&self.tool);
        match std::mem::replace(&mut self.phase, rest) {
            Phase::DrawingStroke(mark) => {
                // Leaving the surface keeps the partial stroke
                log::debug!("Finishing stroke on {event:?}");
                history.commit(mark);
                Outcome::redraw()
            }
            Phase::DraggingSticker(id) => {
                log::debug!("Dropping sticker {id} on {event:?}");
                Outcome::redraw()
            }
            resting @ (Phase::Idle | Phase::PlacingSticker) => {
                self.phase = resting;
                let left = matches!(event, PointerEvent::Leave(_));
                if left && self.preview.take().is_some() {
                    Outcome::redraw()
                } else {
                    Outcome::none()
                }
            }
        }
    }

    /// Switch tools.
    ///
    /// Clears the preview but leaves any construction running; only undo cancels
    /// an in-flight mark.
    pub fn select_tool(&mut self, tool: ToolSelection) -> Outcome {
        log::info!("Selecting tool {:?}", tool);
        self.tool = tool;
        if !self.is_constructing() {
            self.phase = resting_phase(&self.tool);
        }

        if self.preview.take().is_some() {
            Outcome::redraw()
        } else {
            Outcome::none()
        }
    }

    /// Abandon the current construction, if any.
    ///
    /// An in-progress stroke is dropped. A dragged sticker is already committed
    /// and simply stays where it is.
    fn discard_construction(&mut self) -> bool {
        if !self.is_constructing() {
            return false;
        }
        let rest = resting_phase(&self.tool);
        match std::mem::replace(&mut self.phase, rest) {
            Phase::DrawingStroke(mark) => log::info!("Discarding in-progress {}", mark.kind()),
            Phase::DraggingSticker(id) => log::info!("Ending drag of sticker {id}"),
            Phase::Idle | Phase::PlacingSticker => {}
        }
        true
    }

    /// Step history back, or discard the construction if one is running
    pub fn undo(&mut self, history: &mut DocumentHistory) -> Outcome {
        if self.discard_construction() {
            return Outcome::report(HistoryReport::DiscardedConstruction);
        }
        Outcome::report(history.undo())
    }

    /// Step history forward, or discard the construction if one is running
    pub fn redo(&mut self, history: &mut DocumentHistory) -> Outcome {
        if self.discard_construction() {
            return Outcome::report(HistoryReport::DiscardedConstruction);
        }
        Outcome::report(history.redo())
    }

    /// Empty the document, the redo buffer and any construction together
    pub fn clear(&mut self, history: &mut DocumentHistory) -> Outcome {
        self.discard_construction();
        history.clear();
        Outcome::report(HistoryReport::Cleared)
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ToolSelection::freehand(crate::settings::DEFAULT_THIN_WIDTH))
    }
}

fn resting_phase(tool: &ToolSelection) -> Phase {
    match tool {
        ToolSelection::Freehand { .. } => Phase::Idle,
        ToolSelection::Sticker { .. } => Phase::PlacingSticker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn setup(tool: ToolSelection) -> (InteractionController, DocumentHistory) {
        (InteractionController::new(tool), DocumentHistory::new())
    }

    #[test]
    fn test_resting_state_follows_tool() {
        let (mut controller, _) = setup(ToolSelection::freehand(2.0));
        assert_eq!(controller.state(), InteractionState::Idle);

        controller.select_tool(ToolSelection::sticker("😀"));
        assert_eq!(controller.state(), InteractionState::PlacingSticker);

        controller.select_tool(ToolSelection::freehand(6.0));
        assert_eq!(controller.state(), InteractionState::Idle);
    }

    #[test]
    fn test_move_while_idle_only_touches_preview() {
        let (mut controller, mut history) = setup(ToolSelection::freehand(6.0));
        let outcome = controller
            .handle_pointer(PointerEvent::Move(pos2(3.0, 4.0)), &mut history)
            .unwrap();
        assert!(outcome.redraw);
        assert!(history.is_empty());
        assert_eq!(
            controller.preview(),
            Some(&PreviewOverlay::ring(pos2(3.0, 4.0), 6.0))
        );
    }

    #[test]
    fn test_press_destroys_preview() {
        let (mut controller, mut history) = setup(ToolSelection::freehand(2.0));
        controller
            .handle_pointer(PointerEvent::Move(pos2(3.0, 4.0)), &mut history)
            .unwrap();
        controller
            .handle_pointer(PointerEvent::Press(pos2(3.0, 4.0)), &mut history)
            .unwrap();
        assert!(controller.preview().is_none());
        assert_eq!(controller.state(), InteractionState::DrawingStroke);

        // No preview while drawing either
        controller
            .handle_pointer(PointerEvent::Move(pos2(5.0, 4.0)), &mut history)
            .unwrap();
        assert!(controller.preview().is_none());
    }

    #[test]
    fn test_release_without_construction_is_ignored() {
        let (mut controller, mut history) = setup(ToolSelection::freehand(2.0));
        let outcome = controller
            .handle_pointer(PointerEvent::Release(pos2(1.0, 1.0)), &mut history)
            .unwrap();
        assert_eq!(outcome, Outcome::none());
        assert_eq!(controller.state(), InteractionState::Idle);
    }

    #[test]
    fn test_second_press_while_drawing_is_ignored() {
        let (mut controller, mut history) = setup(ToolSelection::freehand(2.0));
        controller
            .handle_pointer(PointerEvent::Press(pos2(1.0, 1.0)), &mut history)
            .unwrap();
        let outcome = controller
            .handle_pointer(PointerEvent::Press(pos2(9.0, 9.0)), &mut history)
            .unwrap();
        assert!(!outcome.redraw);
        let points = controller.in_progress().unwrap().as_stroke().unwrap().points();
        assert_eq!(points, &[pos2(1.0, 1.0)]);
    }

    #[test]
    fn test_tool_change_keeps_construction() {
        let (mut controller, mut history) = setup(ToolSelection::freehand(2.0));
        controller
            .handle_pointer(PointerEvent::Press(pos2(1.0, 1.0)), &mut history)
            .unwrap();
        controller.select_tool(ToolSelection::sticker("⭐"));
        assert_eq!(controller.state(), InteractionState::DrawingStroke);

        controller
            .handle_pointer(PointerEvent::Move(pos2(2.0, 2.0)), &mut history)
            .unwrap();
        controller
            .handle_pointer(PointerEvent::Release(pos2(2.0, 2.0)), &mut history)
            .unwrap();

        // The stroke keeps its own width and the controller rests under the new tool
        assert_eq!(history.committed()[0].as_stroke().unwrap().line_width(), 2.0);
        assert_eq!(controller.state(), InteractionState::PlacingSticker);
    }

    #[test]
    fn test_leave_while_resting_removes_preview() {
        let (mut controller, mut history) = setup(ToolSelection::sticker("🎨"));
        controller
            .handle_pointer(PointerEvent::Move(pos2(1.0, 1.0)), &mut history)
            .unwrap();
        assert!(controller.preview().is_some());

        let outcome = controller
            .handle_pointer(PointerEvent::Leave(pos2(1.0, 1.0)), &mut history)
            .unwrap();
        assert!(outcome.redraw);
        assert!(controller.preview().is_none());
        assert_eq!(controller.state(), InteractionState::PlacingSticker);
    }

    #[test]
    fn test_undo_during_sticker_drag_keeps_sticker() {
        let (mut controller, mut history) = setup(ToolSelection::sticker("😀"));
        controller
            .handle_pointer(PointerEvent::Press(pos2(5.0, 5.0)), &mut history)
            .unwrap();
        controller
            .handle_pointer(PointerEvent::Move(pos2(6.0, 6.0)), &mut history)
            .unwrap();

        let outcome = controller.undo(&mut history);
        assert_eq!(outcome.report, Some(HistoryReport::DiscardedConstruction));
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.committed()[0].as_sticker().unwrap().position(),
            pos2(6.0, 6.0)
        );
        assert_eq!(controller.state(), InteractionState::PlacingSticker);
    }

    #[test]
    fn test_drag_of_vanished_sticker_ends_gracefully() {
        let (mut controller, mut history) = setup(ToolSelection::sticker("😀"));
        controller
            .handle_pointer(PointerEvent::Press(pos2(5.0, 5.0)), &mut history)
            .unwrap();
        // Someone bypassed the controller
        history.clear();

        controller
            .handle_pointer(PointerEvent::Move(pos2(6.0, 6.0)), &mut history)
            .unwrap();
        assert_eq!(controller.state(), InteractionState::PlacingSticker);
        assert!(history.is_empty());
    }
}
