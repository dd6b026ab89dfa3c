//! Resizable, movable widget container.
//!
//! A [`GestureSurface`] turns pointer events into resize and move gestures:
//! - pointer-down on the bottom-right handle starts a resize,
//! - pointer-down on the body starts a move,
//! - anything else passes through to the hosted widget.
//!
//! Geometry changes apply on every move event and are clamped to the parent.
//! Pointer-up or cancel ends the gesture and reports the geometry to commit.

pub mod handles;
pub mod overlay;

pub use handles::HitRegion;
pub use overlay::{Decoration, DecorationKind, DecorationShape};

use crate::config::LayoutConfig;
use crate::host::WidgetId;
use crate::input::{DragTracker, PointerEvent};
use crate::layout::{PositionState, SizeState, WidgetGeometry};
use kurbo::Point;

/// Gesture state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Resizing,
    Moving,
}

/// What the surface did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureResponse {
    /// Not intercepted; deliver to the hosted view.
    Passthrough,
    /// Consumed; geometry may have changed.
    Captured,
    /// Gesture finished; persist this geometry.
    Commit(WidgetGeometry),
}

/// Minimum sizes and handle size for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLimits {
    pub min_width: i32,
    pub min_height: i32,
    pub handle_size: i32,
}

impl From<&LayoutConfig> for SurfaceLimits {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            min_width: config.min_width,
            min_height: config.min_height,
            handle_size: config.handle_size,
        }
    }
}

/// Keep `value` within `[lo, hi]`; when the range is empty, `lo` wins.
fn clamp_axis(value: i32, lo: i32, hi: i32) -> i32 {
    value.min(hi).max(lo)
}

/// Size after a resize step of `(dx, dy)` inside `parent`.
pub fn resized(geometry: WidgetGeometry, dx: i32, dy: i32, parent: SizeState, limits: SurfaceLimits) -> SizeState {
    SizeState::new(
        clamp_axis(
            geometry.size.width.saturating_add(dx),
            limits.min_width,
            parent.width.saturating_sub(geometry.position.left_margin),
        ),
        clamp_axis(
            geometry.size.height.saturating_add(dy),
            limits.min_height,
            parent.height.saturating_sub(geometry.position.top_margin),
        ),
    )
}

/// Position after a move step of `(dx, dy)` inside `parent`.
pub fn moved(geometry: WidgetGeometry, dx: i32, dy: i32, parent: SizeState) -> PositionState {
    PositionState::new(
        clamp_axis(
            geometry.position.left_margin.saturating_add(dx),
            0,
            parent.width.saturating_sub(geometry.size.width),
        ),
        clamp_axis(
            geometry.position.top_margin.saturating_add(dy),
            0,
            parent.height.saturating_sub(geometry.size.height),
        ),
    )
}

/// Fit a geometry from outside a gesture (defaults, saved layout) into `parent`.
///
/// The size is bounded by the parent first, then the position by the room
/// left over, so both clamp laws hold whenever the parent can fit the
/// minimum size.
pub fn clamp_to_parent(geometry: WidgetGeometry, parent: SizeState, limits: SurfaceLimits) -> WidgetGeometry {
    let width = clamp_axis(geometry.size.width, limits.min_width, parent.width);
    let height = clamp_axis(geometry.size.height, limits.min_height, parent.height);
    let left = clamp_axis(geometry.position.left_margin, 0, parent.width.saturating_sub(width));
    let top = clamp_axis(geometry.position.top_margin, 0, parent.height.saturating_sub(height));
    WidgetGeometry::new(SizeState::new(width, height), PositionState::new(left, top))
}

/// Gesture-driven container around one hosted widget.
///
/// Owns only its geometry; the widget id is kept as a back-reference so the
/// owner knows where to persist a commit.
#[derive(Debug, Clone)]
pub struct GestureSurface {
    id: WidgetId,
    geometry: WidgetGeometry,
    state: GestureState,
    drag: DragTracker,
    limits: SurfaceLimits,
}

impl GestureSurface {
    pub fn new(id: WidgetId, geometry: WidgetGeometry, limits: SurfaceLimits) -> Self {
        Self {
            id,
            geometry,
            state: GestureState::Idle,
            drag: DragTracker::default(),
            limits,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn geometry(&self) -> WidgetGeometry {
        self.geometry
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn limits(&self) -> SurfaceLimits {
        self.limits
    }

    /// Replace the geometry, e.g. after the area was re-measured.
    pub fn set_geometry(&mut self, geometry: WidgetGeometry) {
        self.geometry = geometry;
    }

    pub fn set_size(&mut self, size: SizeState) {
        self.geometry.size = size;
    }

    pub fn set_position(&mut self, position: PositionState) {
        self.geometry.position = position;
    }

    /// Gesture a pointer-down at an area point would start.
    pub fn classify(&self, point: Point) -> GestureState {
        let origin = Point::new(
            f64::from(self.geometry.position.left_margin),
            f64::from(self.geometry.position.top_margin),
        );
        let local = Point::new(point.x - origin.x, point.y - origin.y);
        match handles::hit_test(self.geometry.size, self.limits.handle_size, local) {
            HitRegion::ResizeHandle => GestureState::Resizing,
            HitRegion::Body => GestureState::Moving,
            HitRegion::Passthrough => GestureState::Idle,
        }
    }

    /// Feed one pointer event. `parent` is the size of the widget area.
    pub fn handle_event(&mut self, event: PointerEvent, parent: SizeState) -> GestureResponse {
        match event {
            PointerEvent::Down { position } => {
                self.state = self.classify(position);
                if self.state == GestureState::Idle {
                    self.drag.end();
                    return GestureResponse::Passthrough;
                }
                self.drag.begin(position);
                log::trace!("Widget {} gesture started: {:?}", self.id, self.state);
                GestureResponse::Captured
            }
            PointerEvent::Move { position } => {
                let (dx, dy) = self.drag.advance(position);
                match self.state {
                    GestureState::Idle => return GestureResponse::Passthrough,
                    GestureState::Resizing => {
                        self.geometry.size = resized(self.geometry, dx, dy, parent, self.limits);
                    }
                    GestureState::Moving => {
                        self.geometry.position = moved(self.geometry, dx, dy, parent);
                    }
                }
                GestureResponse::Captured
            }
            PointerEvent::Up { .. } | PointerEvent::Cancel => {
                if self.state == GestureState::Idle {
                    return GestureResponse::Passthrough;
                }
                log::trace!("Widget {} gesture finished: {:?}", self.id, self.geometry);
                self.state = GestureState::Idle;
                self.drag.end();
                GestureResponse::Commit(self.geometry)
            }
        }
    }

    /// Overlay hints for the current state.
    pub fn decorations(&self) -> Vec<Decoration> {
        overlay::decorations(
            self.geometry.size,
            self.limits.handle_size,
            self.state == GestureState::Moving,
        )
    }
}


#[cfg(test)]
mod proptest_clamp_tests {
    use super::*;
    use proptest::prelude::*;

    fn limits() -> SurfaceLimits {
        SurfaceLimits::from(&LayoutConfig::default())
    }

    prop_compose! {
        /// A parent that can hold a minimum-sized widget.
        fn arb_parent()(width in 150..4000i32, height in 100..4000i32) -> SizeState {
            SizeState::new(width, height)
        }
    }

    prop_compose! {
        /// Any geometry at all, including values no gesture would produce.
        fn arb_geometry()(
            width in any::<i32>(),
            height in any::<i32>(),
            left in any::<i32>(),
            top in any::<i32>(),
        ) -> WidgetGeometry {
            WidgetGeometry::new(SizeState::new(width, height), PositionState::new(left, top))
        }
    }

    fn assert_in_parent(g: WidgetGeometry, parent: SizeState) -> Result<(), TestCaseError> {
        prop_assert!(g.size.width >= 150 && g.size.width <= parent.width - g.position.left_margin);
        prop_assert!(g.size.height >= 100 && g.size.height <= parent.height - g.position.top_margin);
        prop_assert!(g.position.left_margin >= 0 && g.position.left_margin <= parent.width - g.size.width);
        prop_assert!(g.position.top_margin >= 0 && g.position.top_margin <= parent.height - g.size.height);
        Ok(())
    }

    proptest! {
        #[test]
        fn test_clamp_to_parent_lands_in_parent(geometry in arb_geometry(), parent in arb_parent()) {
            assert_in_parent(clamp_to_parent(geometry, parent, limits()), parent)?;
        }

        #[test]
        fn test_clamp_laws_hold_over_gestures(
            start in arb_geometry(),
            parent in arb_parent(),
            steps in prop::collection::vec((any::<bool>(), -5000..5000i32, -5000..5000i32), 0..32),
        ) {
            let mut geometry = clamp_to_parent(start, parent, limits());
            for (resize, dx, dy) in steps {
                if resize {
                    geometry.size = resized(geometry, dx, dy, parent, limits());
                } else {
                    geometry.position = moved(geometry, dx, dy, parent);
                }
                assert_in_parent(geometry, parent)?;
            }
        }

        #[test]
        fn test_resize_and_move_never_panic(
            geometry in arb_geometry(),
            width in any::<i32>(),
            height in any::<i32>(),
            dx in any::<i32>(),
            dy in any::<i32>(),
        ) {
            let parent = SizeState::new(width, height);
            let size = resized(geometry, dx, dy, parent, limits());
            let position = moved(geometry, dx, dy, parent);
            prop_assert!(size.width >= 150 && size.height >= 100);
            prop_assert!(position.left_margin >= 0 && position.top_margin >= 0);
        }
    }
}
