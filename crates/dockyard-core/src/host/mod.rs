//! Widget hosting.
//!
//! The platform's widget-hosting service is abstracted as [`WidgetHost`].
//! [`WidgetHostManager`] wraps a host and turns every platform failure into
//! an empty result plus a log line, so callers never deal with host errors.

mod manager;
mod memory;

pub use manager::WidgetHostManager;
pub use memory::{MemoryHost, MemoryView};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Platform-assigned widget id. Stable across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub i32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WidgetId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(WidgetId)
    }
}

/// Host errors.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Unknown widget id: {0}")]
    UnknownId(WidgetId),
    #[error("Widget provider not installed: {0}")]
    ProviderMissing(String),
    #[error("Widget host error: {0}")]
    Platform(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Installed descriptor of a widget type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Component name of the provider.
    pub provider: String,
    /// Human-readable name.
    pub label: String,
    /// Component of the provider's configuration screen, if it has one.
    #[serde(default)]
    pub configure: Option<String>,
    #[serde(default)]
    pub min_width: i32,
    #[serde(default)]
    pub min_height: i32,
}

impl ProviderInfo {
    pub fn new(provider: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            label: label.into(),
            configure: None,
            min_width: 0,
            min_height: 0,
        }
    }

    /// Set the configuration screen component.
    pub fn with_configure(mut self, component: impl Into<String>) -> Self {
        self.configure = Some(component.into());
        self
    }

    /// Set the provider's declared minimum size.
    pub fn with_min_size(mut self, width: i32, height: i32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    /// Whether a configure flow must run before first display.
    pub fn requires_configuration(&self) -> bool {
        self.configure.is_some()
    }
}

/// Request to run the platform's "choose a widget" flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerRequest {
    /// Id pre-allocated for the chosen widget.
    pub id: WidgetId,
}

/// Request to run a provider's configuration screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureRequest {
    pub id: WidgetId,
    /// Component of the configuration screen.
    pub component: String,
}

/// Outcome reported by the platform for a picker or configure request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowResult {
    pub success: bool,
    pub id: WidgetId,
}

impl FlowResult {
    pub fn ok(id: WidgetId) -> Self {
        Self { success: true, id }
    }

    pub fn cancelled(id: WidgetId) -> Self {
        Self { success: false, id }
    }
}

/// Capability interface of a platform widget host.
///
/// Implemented by whatever UI toolkit hosts widgets. Views are handles owned
/// by the platform; callers hold them but never manage their lifecycle.
pub trait WidgetHost {
    /// Displayable view of a hosted widget.
    type View;

    /// Start delivering live updates to hosted views.
    fn start_listening(&mut self) -> HostResult<()>;

    /// Stop delivering live updates.
    fn stop_listening(&mut self) -> HostResult<()>;

    /// Reserve a new, unused widget id.
    fn allocate_id(&mut self) -> HostResult<WidgetId>;

    /// Free an allocated id and whatever is bound to it.
    fn delete_id(&mut self, id: WidgetId) -> HostResult<()>;

    /// Instantiate a view for a bound id.
    fn create_view(&mut self, id: WidgetId, info: &ProviderInfo) -> HostResult<Self::View>;

    /// Provider bound to an id, `None` if the id is unbound.
    fn provider_info(&self, id: WidgetId) -> HostResult<Option<ProviderInfo>>;

    /// All installable widget types.
    fn installed_providers(&self) -> HostResult<Vec<ProviderInfo>>;
}
