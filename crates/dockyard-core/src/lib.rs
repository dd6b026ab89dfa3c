//! Dockyard Core Library
//!
//! Platform-agnostic widget area logic for the Dockyard launcher: hosting
//! third-party widgets, resizing and moving them with pointer gestures, and
//! persisting their layout across restarts.

pub mod area;
pub mod config;
pub mod gesture;
pub mod host;
pub mod input;
pub mod layout;
pub mod storage;

pub use area::{FlowStep, Notice, RemovalPrompt, WidgetArea, WidgetInstance};
pub use config::{ConfigError, LayoutConfig, PresetDefaults, PresetTable};
pub use gesture::{Decoration, GestureResponse, GestureState, GestureSurface};
pub use host::{
    ConfigureRequest, FlowResult, HostError, MemoryHost, PickerRequest, ProviderInfo, WidgetHost,
    WidgetHostManager, WidgetId,
};
pub use input::PointerEvent;
pub use layout::{LayoutPreset, LayoutStore, PositionState, SizeState, WidgetGeometry};
pub use storage::{FilePreferences, MemoryPreferences, PrefBatch, PrefValue, PreferenceStore, StorageError};
