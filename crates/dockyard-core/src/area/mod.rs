//! The widget area on the home screen.
//!
//! [`WidgetArea`] ties the host manager, gesture surfaces and layout store
//! together. It is the sole owner of the live widget table; surfaces only
//! know their widget id.
//!
//! Adding a widget is a callback-driven flow:
//!
//! ```text
//! add_widget() -> PickerRequest
//!   on_picker_result(ok) -> Configure(request) -> on_configure_result(ok) -> Attached
//!                        -> Attached
//! ```
//!
//! Cancelling either step leaves persisted state untouched.

mod notice;

pub use notice::Notice;

use crate::config::LayoutConfig;
use crate::gesture::{GestureResponse, GestureSurface, SurfaceLimits, clamp_to_parent};
use crate::host::{ConfigureRequest, FlowResult, PickerRequest, WidgetHost, WidgetHostManager, WidgetId};
use crate::input::PointerEvent;
use crate::layout::{LayoutPreset, LayoutStore, SizeState, WidgetGeometry};
use crate::storage::PreferenceStore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Label shown for widgets whose provider can no longer be queried.
const UNKNOWN_WIDGET_LABEL: &str = "Unknown Widget";

/// A live widget on the home screen.
#[derive(Debug)]
pub struct WidgetInstance<V> {
    id: WidgetId,
    requires_configuration: bool,
    label: String,
    view: V,
    surface: GestureSurface,
}

impl<V> WidgetInstance<V> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn requires_configuration(&self) -> bool {
        self.requires_configuration
    }

    /// Provider label captured when the widget was attached.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Platform view hosted in the container.
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn surface(&self) -> &GestureSurface {
        &self.surface
    }

    pub fn geometry(&self) -> WidgetGeometry {
        self.surface.geometry()
    }
}

/// Next step of the add-widget flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    /// Launch this configuration screen, then report to `on_configure_result`.
    Configure(ConfigureRequest),
    /// The widget is live.
    Attached(WidgetId),
    /// The user backed out; nothing changed.
    Cancelled,
    /// The widget could not be placed; nothing was persisted.
    Failed,
}

/// Confirmation the shell should ask for before removing widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalPrompt {
    Single { id: WidgetId, label: String },
    All,
}

/// Coordinator of the widget area.
pub struct WidgetArea<H: WidgetHost> {
    host: WidgetHostManager<H>,
    store: LayoutStore,
    config: LayoutConfig,
    live: BTreeMap<WidgetId, WidgetInstance<H::View>>,
    preset: LayoutPreset,
    area_width: i32,
    /// Id allocated for an add flow that has not finished yet.
    pending: Option<WidgetId>,
    notices: Vec<Notice>,
}

impl<H: WidgetHost> WidgetArea<H> {
    pub fn new(host: H, prefs: Arc<dyn PreferenceStore>, config: LayoutConfig) -> Self {
        let store = LayoutStore::new(prefs);
        let preset = store.preset();
        Self {
            host: WidgetHostManager::new(host),
            store,
            area_width: config.area_width,
            config,
            live: BTreeMap::new(),
            preset,
            pending: None,
            notices: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        self.host.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.host.host_mut()
    }

    pub fn host_manager(&self) -> &WidgetHostManager<H> {
        &self.host
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn preset(&self) -> LayoutPreset {
        self.preset
    }

    /// The area is shown iff at least one widget is live.
    pub fn is_visible(&self) -> bool {
        !self.live.is_empty()
    }

    /// Height of the area under the current preset.
    pub fn area_height(&self) -> i32 {
        self.config.presets.get(self.preset).area_height
    }

    /// Size of the area that containers are clamped to.
    pub fn area_size(&self) -> SizeState {
        SizeState::new(self.area_width, self.area_height())
    }

    /// Update the area width once the platform has measured it.
    ///
    /// Live containers are refitted to the new width; saved layout is only
    /// rewritten by the next gesture.
    pub fn set_area_width(&mut self, width: i32) {
        self.area_width = width.max(0);
        let parent = self.area_size();
        for instance in self.live.values_mut() {
            let fitted = clamp_to_parent(instance.geometry(), parent, instance.surface.limits());
            instance.surface.set_geometry(fitted);
        }
    }

    pub fn live_ids(&self) -> Vec<WidgetId> {
        self.live.keys().copied().collect()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn instance(&self, id: WidgetId) -> Option<&WidgetInstance<H::View>> {
        self.live.get(&id)
    }

    pub fn instances(&self) -> impl Iterator<Item = &WidgetInstance<H::View>> {
        self.live.values()
    }

    pub fn geometry(&self, id: WidgetId) -> Option<WidgetGeometry> {
        self.live.get(&id).map(WidgetInstance::geometry)
    }

    /// Drain queued user notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// The home screen became visible.
    pub fn on_show(&mut self) {
        self.restore_on_start();
        self.host.start_listening();
    }

    /// The home screen was hidden.
    pub fn on_hide(&mut self) {
        self.host.stop_listening();
    }

    /// Start the add-widget flow. Returns the picker request to launch.
    pub fn add_widget(&mut self) -> Option<PickerRequest> {
        if !self.store.widgets_enabled() {
            log::info!("Widget add requested while widgets are disabled");
            self.notices.push(Notice::WidgetsDisabled);
            return None;
        }

        self.abandon_pending();
        match self.host.build_picker_request() {
            Some(request) => {
                self.pending = Some(request.id);
                Some(request)
            }
            None => {
                self.notices.push(Notice::PickerUnavailable);
                None
            }
        }
    }

    /// The picker returned.
    pub fn on_picker_result(&mut self, result: FlowResult) -> FlowStep {
        if let Some(pending) = self.pending {
            if pending != result.id {
                log::warn!("Picker returned id {} but {} was pending", result.id, pending);
                self.abandon_pending();
            }
        }
        self.pending = Some(result.id);

        if !result.success {
            log::debug!("Widget picker cancelled");
            self.abandon_pending();
            return FlowStep::Cancelled;
        }

        let requires_configuration = self
            .host
            .provider_info(result.id)
            .is_some_and(|info| info.requires_configuration());
        if requires_configuration {
            if let Some(request) = self.host.build_configure_request(result.id) {
                log::debug!("Widget {} needs configuration via {}", result.id, request.component);
                return FlowStep::Configure(request);
            }
        }

        self.finish_flow(result.id)
    }

    /// The configuration screen returned.
    pub fn on_configure_result(&mut self, result: FlowResult) -> FlowStep {
        if self.pending != Some(result.id) {
            log::warn!("Ignoring configure result for unexpected widget {}", result.id);
            return FlowStep::Failed;
        }

        if !result.success {
            log::debug!("Widget configuration cancelled");
            self.abandon_pending();
            return FlowStep::Cancelled;
        }

        self.finish_flow(result.id)
    }

    fn finish_flow(&mut self, id: WidgetId) -> FlowStep {
        if self.attach(id) {
            self.pending = None;
            FlowStep::Attached(id)
        } else {
            self.abandon_pending();
            FlowStep::Failed
        }
    }

    /// Release the id of an unfinished add flow.
    fn abandon_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            if !self.live.contains_key(&id) {
                self.host.release_id(id);
            }
        }
    }

    /// Place a bound widget in the area. Returns whether it is live.
    pub fn attach(&mut self, id: WidgetId) -> bool {
        self.attach_inner(id, true)
    }

    fn attach_inner(&mut self, id: WidgetId, announce: bool) -> bool {
        if self.live.contains_key(&id) {
            log::debug!("Widget {} is already attached", id);
            return true;
        }

        let Some(info) = self.host.provider_info(id) else {
            log::warn!("Not attaching widget {}: no installed provider", id);
            self.notices.push(Notice::NotInstalled(id));
            return false;
        };
        let Some(view) = self.host.create_view(id) else {
            self.notices.push(Notice::ViewCreationFailed(id));
            return false;
        };

        let defaults = *self.config.presets.get(self.preset);
        let (saved_size, saved_position) = self.store.saved_layout(id);
        let limits = SurfaceLimits::from(&self.config);
        let geometry = clamp_to_parent(
            WidgetGeometry::new(
                saved_size.unwrap_or_else(|| defaults.size()),
                saved_position.unwrap_or_else(|| defaults.position()),
            ),
            self.area_size(),
            limits,
        );
        let surface = GestureSurface::new(id, geometry, limits);

        let first = self.live.is_empty();
        self.live.insert(
            id,
            WidgetInstance {
                id,
                requires_configuration: info.requires_configuration(),
                label: info.label.clone(),
                view,
                surface,
            },
        );
        if let Err(e) = self.store.add_id(id) {
            log::error!("Failed to persist widget id {}: {}", id, e);
        }

        log::info!("Attached widget {} ({}) at {:?}", id, info.label, geometry);
        if first {
            log::info!(
                "Widget area visible ({} preset, height {})",
                self.preset.name(),
                self.area_height()
            );
        }
        if announce {
            if first {
                self.notices.push(Notice::ResizeHelp);
            }
            self.notices.push(Notice::WidgetAdded(info.label));
        }
        true
    }

    /// Remove one widget and everything persisted for it.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let Some(instance) = self.live.remove(&id) else {
            log::debug!("Ignoring removal of widget {}: not attached", id);
            return false;
        };
        // Dropping the instance detaches its surface and view.
        drop(instance);

        self.host.release_id(id);
        if let Err(e) = self.store.purge(id) {
            log::error!("Failed to purge widget {}: {}", id, e);
        }

        log::info!("Removed widget {}", id);
        if self.live.is_empty() {
            log::info!("Widget area hidden");
        }
        true
    }

    /// Remove every widget, clear saved layout and switch widgets off.
    pub fn remove_all(&mut self) {
        for id in self.live_ids() {
            self.remove(id);
        }
        if let Err(e) = self.store.reset_and_disable() {
            log::error!("Failed to reset widget layout: {}", e);
        }
        log::info!("Removed all widgets");
    }

    /// Switch layout preset.
    ///
    /// Widgets without a saved size or position take the new preset's
    /// defaults, fitted to the area; fully saved widgets stay as they are.
    pub fn apply_preset(&mut self, preset: LayoutPreset) {
        self.preset = preset;
        if let Err(e) = self.store.set_preset(preset) {
            log::error!("Failed to persist widget preset: {}", e);
        }

        let defaults = *self.config.presets.get(preset);
        let parent = self.area_size();
        let sizes = self.store.sizes();
        let positions = self.store.positions();
        for (id, instance) in self.live.iter_mut() {
            let saved_size = sizes.contains_key(id);
            let saved_position = positions.contains_key(id);
            if saved_size && saved_position {
                continue;
            }
            if !saved_size {
                instance.surface.set_size(defaults.size());
            }
            if !saved_position {
                instance.surface.set_position(defaults.position());
            }
            let fitted = clamp_to_parent(instance.geometry(), parent, instance.surface.limits());
            instance.surface.set_geometry(fitted);
        }

        log::info!("Applied {} preset (area height {})", preset.name(), defaults.area_height);
    }

    /// Re-attach the persisted widgets that are still installed.
    ///
    /// Ids whose provider is gone are skipped; the persisted set is left as
    /// stored.
    pub fn restore_on_start(&mut self) {
        if !self.store.widgets_enabled() {
            log::debug!("Widgets disabled; nothing to restore");
            return;
        }

        let ids = self.store.widget_ids();
        if ids.is_empty() {
            self.notices.push(Notice::AddWidgetHint);
            return;
        }

        let had_widgets = !self.live.is_empty();
        for id in ids {
            if self.live.contains_key(&id) {
                continue;
            }
            if self.host.is_bound(id) {
                self.attach_inner(id, false);
            } else {
                log::debug!("Dropping stale widget {}", id);
            }
        }

        if !had_widgets && !self.live.is_empty() {
            self.notices.push(Notice::ResizeHelp);
        }
    }

    /// Route a pointer event to a widget container.
    ///
    /// Completed gestures are persisted before returning.
    pub fn handle_pointer(&mut self, id: WidgetId, event: PointerEvent) -> GestureResponse {
        let parent = self.area_size();
        let Some(instance) = self.live.get_mut(&id) else {
            return GestureResponse::Passthrough;
        };

        let response = instance.surface.handle_event(event, parent);
        if let GestureResponse::Commit(geometry) = response {
            if let Err(e) = self.store.save_geometry(id, geometry) {
                log::error!("Failed to save layout of widget {}: {}", id, e);
            }
        }
        response
    }

    /// A widget container was long-pressed.
    pub fn on_widget_long_press(&mut self, id: WidgetId) -> Option<RemovalPrompt> {
        if !self.live.contains_key(&id) {
            return None;
        }
        Some(RemovalPrompt::Single {
            id,
            label: self.widget_label(id),
        })
    }

    /// The empty part of the area was long-pressed.
    pub fn on_area_long_press(&mut self) -> Option<RemovalPrompt> {
        if self.live.is_empty() {
            self.notices.push(Notice::NothingToManage);
            return None;
        }
        Some(RemovalPrompt::All)
    }

    /// The user confirmed a removal prompt.
    pub fn confirm_removal(&mut self, prompt: RemovalPrompt) {
        match prompt {
            RemovalPrompt::Single { id, .. } => {
                self.remove(id);
            }
            RemovalPrompt::All => self.remove_all(),
        }
    }

    /// Live widgets with their current provider labels.
    pub fn widget_list(&mut self) -> Vec<(WidgetId, String)> {
        if self.live.is_empty() {
            self.notices.push(Notice::NothingToManage);
            return Vec::new();
        }
        self.live_ids()
            .into_iter()
            .map(|id| (id, self.widget_label(id)))
            .collect()
    }

    /// Number of widget types the user could add.
    pub fn available_widget_count(&self) -> usize {
        self.host.list_providers().len()
    }

    fn widget_label(&self, id: WidgetId) -> String {
        self.host
            .provider_info(id)
            .map(|info| info.label)
            .unwrap_or_else(|| UNKNOWN_WIDGET_LABEL.to_string())
    }
}
