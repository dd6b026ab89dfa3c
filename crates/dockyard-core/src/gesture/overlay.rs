//! Overlay decoration drawn on top of a widget container.
//!
//! Decorations are hints only; none of them dispatches an action.

use super::handles::{REMOVE_HINT_SIZE, remove_hint_rect, resize_handle_rect};
use crate::layout::SizeState;
use kurbo::{Line, Point, Rect};
use peniko::Color;

/// What a decoration indicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    ResizeHandle,
    RemoveHint,
    MoveOutline,
}

/// Stroked primitive in container-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecorationShape {
    Rect(Rect),
    Line(Line),
}

/// One stroked overlay primitive.
#[derive(Debug, Clone, Copy)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub shape: DecorationShape,
    pub color: Color,
    pub stroke_width: f64,
}

impl Decoration {
    fn new(kind: DecorationKind, shape: DecorationShape, color: Color, stroke_width: f64) -> Self {
        Self {
            kind,
            shape,
            color,
            stroke_width,
        }
    }
}

fn handle_color() -> Color {
    Color::from_rgba8(136, 136, 136, 255)
}

fn remove_color() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}

fn move_color() -> Color {
    Color::from_rgba8(0, 0, 255, 255)
}

/// Build the overlay for a container of `size`.
pub fn decorations(size: SizeState, handle_size: i32, moving: bool) -> Vec<Decoration> {
    let handle = resize_handle_rect(size, handle_size);
    let hint = remove_hint_rect(size);

    let mut out = vec![
        Decoration::new(DecorationKind::ResizeHandle, DecorationShape::Rect(handle), handle_color(), 3.0),
        Decoration::new(
            DecorationKind::ResizeHandle,
            DecorationShape::Line(Line::new(Point::new(handle.x0, handle.y1), Point::new(handle.x1, handle.y0))),
            handle_color(),
            3.0,
        ),
        Decoration::new(
            DecorationKind::RemoveHint,
            DecorationShape::Line(Line::new(
                Point::new(hint.x0, hint.y0),
                Point::new(hint.x0 + REMOVE_HINT_SIZE, hint.y0 + REMOVE_HINT_SIZE),
            )),
            remove_color(),
            2.0,
        ),
        Decoration::new(
            DecorationKind::RemoveHint,
            DecorationShape::Line(Line::new(
                Point::new(hint.x1, hint.y0),
                Point::new(hint.x0, hint.y0 + REMOVE_HINT_SIZE),
            )),
            remove_color(),
            2.0,
        ),
    ];

    if moving {
        out.push(Decoration::new(
            DecorationKind::MoveOutline,
            DecorationShape::Rect(Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height))),
            move_color(),
            2.0,
        ));
    }
    out
}
