//! Pointer input events for widget containers.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Pointer event delivered to a widget container.
///
/// Positions are in widget-area coordinates; the container subtracts its own
/// origin when hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The platform took the pointer away (e.g. a parent scrolled).
    Cancel,
}

impl PointerEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(*position),
            PointerEvent::Cancel => None,
        }
    }

    /// Whether this event ends a gesture.
    pub fn is_release(&self) -> bool {
        matches!(self, PointerEvent::Up { .. } | PointerEvent::Cancel)
    }
}

/// Converts continuous pointer motion into whole-unit deltas.
///
/// Fractional motion is carried to the next event instead of being dropped,
/// so slow drags still add up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragTracker {
    last: Option<Point>,
}

impl DragTracker {
    /// Start tracking from `position`.
    pub fn begin(&mut self, position: Point) {
        self.last = Some(position);
    }

    /// Stop tracking.
    pub fn end(&mut self) {
        self.last = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.last.is_some()
    }

    /// Whole-unit delta since the last consumed position.
    pub fn advance(&mut self, position: Point) -> (i32, i32) {
        let Some(last) = self.last else {
            return (0, 0);
        };
        let raw: Vec2 = position - last;
        let dx = raw.x.trunc();
        let dy = raw.y.trunc();
        self.last = Some(Point::new(last.x + dx, last.y + dy));
        (dx as i32, dy as i32)
    }
}
