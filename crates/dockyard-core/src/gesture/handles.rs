//! Hit regions of a widget container.

use crate::layout::SizeState;
use kurbo::{Point, Rect};

/// Side of the removal cross drawn in the top-right corner.
pub const REMOVE_HINT_SIZE: f64 = 30.0;
/// Inset of the removal cross from the top and right edges.
pub const REMOVE_HINT_INSET: f64 = 10.0;

/// Region of a container under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitRegion {
    /// Bottom-right resize handle.
    ResizeHandle,
    /// Draggable body of the container.
    Body,
    /// Anywhere else; the hosted view gets the event.
    Passthrough,
}

/// Container rectangle in local coordinates.
pub fn container_rect(size: SizeState) -> Rect {
    Rect::new(0.0, 0.0, f64::from(size.width.max(0)), f64::from(size.height.max(0)))
}

/// Square resize handle anchored at the bottom-right corner.
pub fn resize_handle_rect(size: SizeState, handle_size: i32) -> Rect {
    let container = container_rect(size);
    let handle = f64::from(handle_size);
    Rect::new(
        (container.x1 - handle).max(0.0),
        (container.y1 - handle).max(0.0),
        container.x1,
        container.y1,
    )
}

/// Draggable body: the container minus the right and bottom handle strips.
pub fn body_rect(size: SizeState, handle_size: i32) -> Rect {
    let container = container_rect(size);
    let handle = f64::from(handle_size);
    Rect::new(0.0, 0.0, container.x1 - handle, container.y1 - handle)
}

/// Removal hint in the top-right corner.
pub fn remove_hint_rect(size: SizeState) -> Rect {
    let right = f64::from(size.width);
    let x0 = right - REMOVE_HINT_SIZE - REMOVE_HINT_INSET;
    Rect::new(x0, REMOVE_HINT_INSET, x0 + REMOVE_HINT_SIZE, REMOVE_HINT_INSET + REMOVE_HINT_SIZE)
}

/// Classify a container-local point. The resize handle wins over the body.
pub fn hit_test(size: SizeState, handle_size: i32, point: Point) -> HitRegion {
    if !container_rect(size).contains(point) {
        return HitRegion::Passthrough;
    }
    if resize_handle_rect(size, handle_size).contains(point) {
        HitRegion::ResizeHandle
    } else if body_rect(size, handle_size).contains(point) {
        HitRegion::Body
    } else {
        HitRegion::Passthrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: SizeState = SizeState::new(320, 520);

    #[test]
    fn test_handle_corner() {
        assert_eq!(hit_test(SIZE, 60, Point::new(300.0, 500.0)), HitRegion::ResizeHandle);
        assert_eq!(hit_test(SIZE, 60, Point::new(260.0, 460.0)), HitRegion::ResizeHandle);
    }

    #[test]
    fn test_body() {
        assert_eq!(hit_test(SIZE, 60, Point::new(0.0, 0.0)), HitRegion::Body);
        assert_eq!(hit_test(SIZE, 60, Point::new(150.0, 200.0)), HitRegion::Body);
    }

    #[test]
    fn test_edge_strips_pass_through() {
        // Right strip above the handle
        assert_eq!(hit_test(SIZE, 60, Point::new(300.0, 100.0)), HitRegion::Passthrough);
        // Bottom strip left of the handle
        assert_eq!(hit_test(SIZE, 60, Point::new(100.0, 500.0)), HitRegion::Passthrough);
    }

    #[test]
    fn test_outside_passes_through() {
        assert_eq!(hit_test(SIZE, 60, Point::new(-1.0, 10.0)), HitRegion::Passthrough);
        assert_eq!(hit_test(SIZE, 60, Point::new(320.0, 10.0)), HitRegion::Passthrough);
        assert_eq!(hit_test(SIZE, 60, Point::new(10.0, 600.0)), HitRegion::Passthrough);
    }

    #[test]
    fn test_tiny_container_is_all_handle() {
        let tiny = SizeState::new(40, 40);
        assert_eq!(hit_test(tiny, 60, Point::new(1.0, 1.0)), HitRegion::ResizeHandle);
    }

    #[test]
    fn test_remove_hint_position() {
        assert_eq!(remove_hint_rect(SIZE), Rect::new(280.0, 10.0, 310.0, 40.0));
    }
}
