//! Widget geometry, layout presets, and their persistence.

pub mod codec;
mod store;

pub use codec::{decode_positions, decode_sizes, encode_positions, encode_sizes, EMPTY_ENCODING};
pub use store::{keys, LayoutStore};

use crate::host::WidgetId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Saved size of a widget container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeState {
    pub width: i32,
    pub height: i32,
}

impl SizeState {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Saved offset of a widget container inside the widget area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionState {
    pub left_margin: i32,
    pub top_margin: i32,
}

impl PositionState {
    pub const fn new(left_margin: i32, top_margin: i32) -> Self {
        Self {
            left_margin,
            top_margin,
        }
    }
}

/// Size and position of one widget container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetGeometry {
    pub size: SizeState,
    pub position: PositionState,
}

impl WidgetGeometry {
    pub const fn new(size: SizeState, position: PositionState) -> Self {
        Self { size, position }
    }

    pub fn right(&self) -> i32 {
        self.position.left_margin.saturating_add(self.size.width)
    }

    pub fn bottom(&self) -> i32 {
        self.position.top_margin.saturating_add(self.size.height)
    }

    /// Container bounds in widget-area coordinates.
    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.position.left_margin),
            f64::from(self.position.top_margin),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// Saved sizes keyed by widget id.
pub type SizeMap = BTreeMap<WidgetId, SizeState>;

/// Saved positions keyed by widget id.
pub type PositionMap = BTreeMap<WidgetId, PositionState>;

/// Where the widget area sits on the home screen.
///
/// Selects the area height and the default geometry of widgets that have no
/// saved layout yet. Stored externally as its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreset {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl LayoutPreset {
    pub const ALL: [LayoutPreset; 3] = [LayoutPreset::Top, LayoutPreset::Middle, LayoutPreset::Bottom];

    /// Stored index of this preset.
    pub fn index(self) -> i64 {
        match self {
            LayoutPreset::Top => 0,
            LayoutPreset::Middle => 1,
            LayoutPreset::Bottom => 2,
        }
    }

    /// Preset for a stored index; unknown values mean `Top`.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => LayoutPreset::Middle,
            2 => LayoutPreset::Bottom,
            _ => LayoutPreset::Top,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            LayoutPreset::Top => "Top",
            LayoutPreset::Middle => "Middle",
            LayoutPreset::Bottom => "Bottom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_index_round_trip() {
        for preset in LayoutPreset::ALL {
            assert_eq!(LayoutPreset::from_index(preset.index()), preset);
        }
        assert_eq!(LayoutPreset::from_index(9), LayoutPreset::Top);
        assert_eq!(LayoutPreset::from_index(-1), LayoutPreset::Top);
    }

    #[test]
    fn test_geometry_bounds() {
        let geometry = WidgetGeometry::new(SizeState::new(320, 520), PositionState::new(10, 20));
        assert_eq!(geometry.right(), 330);
        assert_eq!(geometry.bottom(), 540);
        assert_eq!(geometry.bounds(), kurbo::Rect::new(10.0, 20.0, 330.0, 540.0));
    }
}
