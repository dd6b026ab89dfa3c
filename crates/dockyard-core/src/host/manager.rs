//! Failure-tolerant wrapper around a platform widget host.

use super::{ConfigureRequest, PickerRequest, ProviderInfo, WidgetHost, WidgetId};

/// Lifecycle manager for hosted widgets.
///
/// Every operation that reaches the platform may fail because a provider was
/// uninstalled or an id went stale. Failures are logged and degrade to
/// `None`, `false` or an empty list.
#[derive(Debug)]
pub struct WidgetHostManager<H: WidgetHost> {
    host: H,
    listening: bool,
}

impl<H: WidgetHost> WidgetHostManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            listening: false,
        }
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the wrapped host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Let the platform deliver live updates. Idempotent.
    pub fn start_listening(&mut self) {
        if self.listening {
            return;
        }
        match self.host.start_listening() {
            Ok(()) => self.listening = true,
            Err(e) => log::error!("Failed to start widget host: {}", e),
        }
    }

    /// Stop live updates. Idempotent.
    pub fn stop_listening(&mut self) {
        if !self.listening {
            return;
        }
        if let Err(e) = self.host.stop_listening() {
            log::error!("Failed to stop widget host: {}", e);
        }
        self.listening = false;
    }

    /// Reserve a new widget id.
    pub fn allocate_id(&mut self) -> Option<WidgetId> {
        match self.host.allocate_id() {
            Ok(id) => {
                log::debug!("Allocated widget id {}", id);
                Some(id)
            }
            Err(e) => {
                log::error!("Failed to allocate widget id: {}", e);
                None
            }
        }
    }

    /// Free an id. Safe on ids without a live view.
    pub fn release_id(&mut self, id: WidgetId) {
        match self.host.delete_id(id) {
            Ok(()) => log::debug!("Released widget id {}", id),
            Err(e) => log::warn!("Failed to release widget id {}: {}", id, e),
        }
    }

    /// Instantiate a view for `id`.
    pub fn create_view(&mut self, id: WidgetId) -> Option<H::View> {
        let Some(info) = self.provider_info(id) else {
            log::error!("Error creating widget view: no provider bound to {}", id);
            return None;
        };
        match self.host.create_view(id, &info) {
            Ok(view) => Some(view),
            Err(e) => {
                log::error!("Error creating widget view for {}: {}", id, e);
                None
            }
        }
    }

    /// Capability metadata of the provider bound to `id`.
    pub fn provider_info(&self, id: WidgetId) -> Option<ProviderInfo> {
        match self.host.provider_info(id) {
            Ok(info) => info,
            Err(e) => {
                log::error!("Error getting widget info for {}: {}", id, e);
                None
            }
        }
    }

    /// Whether `id` is still backed by an installed provider.
    pub fn is_bound(&self, id: WidgetId) -> bool {
        match self.host.provider_info(id) {
            Ok(info) => info.is_some(),
            Err(e) => {
                log::warn!("Error checking binding of widget {}: {}", id, e);
                false
            }
        }
    }

    /// All installable widget types.
    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        match self.host.installed_providers() {
            Ok(providers) => providers,
            Err(e) => {
                log::error!("Error getting available widgets: {}", e);
                Vec::new()
            }
        }
    }

    /// Whether any widget type can be added.
    pub fn widgets_available(&self) -> bool {
        !self.list_providers().is_empty()
    }

    /// Allocate an id and build the "choose a widget" request for it.
    pub fn build_picker_request(&mut self) -> Option<PickerRequest> {
        self.allocate_id().map(|id| PickerRequest { id })
    }

    /// Build the configure request for `id`, if its provider needs one.
    pub fn build_configure_request(&self, id: WidgetId) -> Option<ConfigureRequest> {
        let info = self.provider_info(id)?;
        info.configure.map(|component| ConfigureRequest { id, component })
    }
}
