//! Scripted shell for the widget area.
//!
//! A script is a JSON array of commands standing in for the platform: user
//! taps, picker and configure screens returning, packages being removed.

use dockyard_core::{
    ConfigureRequest, FlowResult, FlowStep, GestureResponse, LayoutPreset, MemoryHost, PickerRequest,
    PointerEvent, PositionState, ProviderInfo, RemovalPrompt, SizeState, WidgetArea, WidgetHost, WidgetId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// The home screen became visible.
    Show,
    /// The home screen was hidden.
    Hide,
    InstallProvider(ProviderInfo),
    Uninstall { provider: String },
    EnableWidgets { enabled: bool },
    /// The user asked to add a widget; opens the picker.
    AddWidget,
    /// The picker returned. `None` means the user backed out.
    PickerResult {
        #[serde(default)]
        provider: Option<String>,
    },
    /// The configuration screen returned.
    ConfigureResult { success: bool },
    Pointer { widget: WidgetId, event: PointerEvent },
    LongPressWidget { widget: WidgetId },
    LongPressArea,
    /// Accept the last removal prompt.
    Confirm,
    RemoveAll,
    ApplyPreset { preset: LayoutPreset },
    SetAreaWidth { width: i32 },
}

/// Parse a script document.
pub fn parse(json: &str) -> Result<Vec<Command>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// Final state of one widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetReport {
    pub id: WidgetId,
    pub label: String,
    pub size: SizeState,
    pub position: PositionState,
}

/// Final state of the area after a script ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    pub visible: bool,
    pub preset: LayoutPreset,
    pub area_height: i32,
    pub widgets: Vec<WidgetReport>,
    pub notices: Vec<String>,
}

/// Drives a [`WidgetArea`] over a [`MemoryHost`].
pub struct ScriptRunner {
    area: WidgetArea<MemoryHost>,
    picker: Option<PickerRequest>,
    configure: Option<ConfigureRequest>,
    prompt: Option<RemovalPrompt>,
    notices: Vec<String>,
}

impl ScriptRunner {
    pub fn new(area: WidgetArea<MemoryHost>) -> Self {
        Self {
            area,
            picker: None,
            configure: None,
            prompt: None,
            notices: Vec::new(),
        }
    }

    pub fn area(&self) -> &WidgetArea<MemoryHost> {
        &self.area
    }

    pub fn run(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.step(command);
        }
    }

    /// Execute one command.
    pub fn step(&mut self, command: Command) {
        log::debug!("Running {:?}", command);
        match command {
            Command::Show => self.area.on_show(),
            Command::Hide => self.area.on_hide(),
            Command::InstallProvider(info) => {
                log::info!("Installed provider {}", info.provider);
                self.area.host_mut().install(info);
            }
            Command::Uninstall { provider } => {
                log::info!("Uninstalled provider {}", provider);
                self.area.host_mut().uninstall(&provider);
            }
            Command::EnableWidgets { enabled } => {
                if let Err(e) = self.area.store().set_widgets_enabled(enabled) {
                    log::error!("Failed to update widget setting: {}", e);
                }
            }
            Command::AddWidget => self.picker = self.area.add_widget(),
            Command::PickerResult { provider } => self.picker_result(provider),
            Command::ConfigureResult { success } => self.configure_result(success),
            Command::Pointer { widget, event } => {
                if let GestureResponse::Commit(geometry) = self.area.handle_pointer(widget, event) {
                    log::info!("Widget {} laid out at {:?}", widget, geometry);
                }
            }
            Command::LongPressWidget { widget } => self.prompt = self.area.on_widget_long_press(widget),
            Command::LongPressArea => self.prompt = self.area.on_area_long_press(),
            Command::Confirm => match self.prompt.take() {
                Some(prompt) => self.area.confirm_removal(prompt),
                None => log::warn!("Nothing to confirm"),
            },
            Command::RemoveAll => self.area.remove_all(),
            Command::ApplyPreset { preset } => self.area.apply_preset(preset),
            Command::SetAreaWidth { width } => self.area.set_area_width(width),
        }
        self.collect_notices();
    }

    fn picker_result(&mut self, provider: Option<String>) {
        let Some(request) = self.picker.take() else {
            log::warn!("Picker result without an open picker");
            return;
        };

        let result = match provider {
            Some(provider) => match self.area.host_mut().bind(request.id, &provider) {
                Ok(()) => FlowResult::ok(request.id),
                Err(e) => {
                    log::warn!("Picker could not bind {}: {}", provider, e);
                    FlowResult::cancelled(request.id)
                }
            },
            None => FlowResult::cancelled(request.id),
        };
        let step = self.area.on_picker_result(result);
        self.follow(step);
    }

    fn configure_result(&mut self, success: bool) {
        let Some(request) = self.configure.take() else {
            log::warn!("Configure result without an open configuration screen");
            return;
        };
        let result = FlowResult {
            success,
            id: request.id,
        };
        let step = self.area.on_configure_result(result);
        self.follow(step);
    }

    fn follow(&mut self, step: FlowStep) {
        match step {
            FlowStep::Configure(request) => {
                log::info!("Opening {} for widget {}", request.component, request.id);
                self.configure = Some(request);
            }
            FlowStep::Attached(id) => log::info!("Widget {} attached", id),
            FlowStep::Cancelled => log::info!("Add widget cancelled"),
            FlowStep::Failed => log::warn!("Add widget failed"),
        }
    }

    fn collect_notices(&mut self) {
        for notice in self.area.take_notices() {
            log::info!("Notice: {}", notice);
            self.notices.push(notice.to_string());
        }
    }

    /// Snapshot of the area and every notice shown so far.
    pub fn report(&self) -> AreaReport {
        let host = self.area.host();
        let widgets = self
            .area
            .instances()
            .map(|instance| {
                let geometry = instance.geometry();
                let label = host
                    .provider_info(instance.id())
                    .ok()
                    .flatten()
                    .map(|info| info.label)
                    .unwrap_or_else(|| instance.label().to_string());
                WidgetReport {
                    id: instance.id(),
                    label,
                    size: geometry.size,
                    position: geometry.position,
                }
            })
            .collect();

        AreaReport {
            visible: self.area.is_visible(),
            preset: self.area.preset(),
            area_height: self.area.area_height(),
            widgets,
            notices: self.notices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_core::{LayoutConfig, MemoryPreferences, Notice, PreferenceStore};
    use std::sync::Arc;

    fn runner() -> (Arc<MemoryPreferences>, ScriptRunner) {
        let prefs = Arc::new(MemoryPreferences::new());
        let area = WidgetArea::new(MemoryHost::new(), prefs.clone(), LayoutConfig::default());
        (prefs, ScriptRunner::new(area))
    }

    const SETUP: &str = r#"[
        {"command": "install_provider", "provider": "org.clock/.Widget", "label": "Clock"},
        {"command": "install_provider", "provider": "org.weather/.Widget", "label": "Weather", "configure": "org.weather/.Setup"},
        {"command": "enable_widgets", "enabled": true},
        {"command": "show"}
    ]"#;

    fn run(runner: &mut ScriptRunner, json: &str) {
        runner.run(parse(json).unwrap());
    }

    #[test]
    fn test_parse_commands() {
        let commands = parse(
            r#"[
                {"command": "pointer", "widget": 3, "event": {"kind": "down", "position": {"x": 10.0, "y": 20.0}}},
                {"command": "apply_preset", "preset": "bottom"},
                {"command": "picker_result"}
            ]"#,
        )
        .unwrap();

        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], Command::Pointer { widget: WidgetId(3), .. }));
        assert_eq!(commands[1], Command::ApplyPreset { preset: LayoutPreset::Bottom });
        assert_eq!(commands[2], Command::PickerResult { provider: None });
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(parse(r#"[{"command": "explode"}]"#).is_err());
    }

    #[test]
    fn test_add_and_move_widget() {
        let (_, mut runner) = runner();
        run(&mut runner, SETUP);
        run(
            &mut runner,
            r#"[
                {"command": "add_widget"},
                {"command": "picker_result", "provider": "org.clock/.Widget"},
                {"command": "pointer", "widget": 1, "event": {"kind": "down", "position": {"x": 30.0, "y": 30.0}}},
                {"command": "pointer", "widget": 1, "event": {"kind": "move", "position": {"x": 50.0, "y": 40.0}}},
                {"command": "pointer", "widget": 1, "event": {"kind": "up", "position": {"x": 50.0, "y": 40.0}}}
            ]"#,
        );

        let report = runner.report();
        assert!(report.visible);
        assert_eq!(
            report.widgets,
            vec![WidgetReport {
                id: WidgetId(1),
                label: "Clock".to_string(),
                size: SizeState::new(320, 520),
                position: PositionState::new(30, 20),
            }]
        );
        assert!(report.notices.contains(&"Clock added".to_string()));
    }

    #[test]
    fn test_configure_flow() {
        let (prefs, mut runner) = runner();
        run(&mut runner, SETUP);
        run(
            &mut runner,
            r#"[
                {"command": "add_widget"},
                {"command": "picker_result", "provider": "org.weather/.Widget"},
                {"command": "configure_result", "success": false},
                {"command": "add_widget"},
                {"command": "picker_result", "provider": "org.weather/.Widget"},
                {"command": "configure_result", "success": true}
            ]"#,
        );

        let report = runner.report();
        assert_eq!(report.widgets.len(), 1);
        assert_eq!(report.widgets[0].id, WidgetId(2));
        assert_eq!(
            prefs.get_string_set("widget_ids").unwrap(),
            Some(["2".to_string()].into_iter().collect())
        );
    }

    #[test]
    fn test_long_press_remove_all() {
        let (_, mut runner) = runner();
        run(&mut runner, SETUP);
        run(
            &mut runner,
            r#"[
                {"command": "add_widget"},
                {"command": "picker_result", "provider": "org.clock/.Widget"},
                {"command": "long_press_area"},
                {"command": "confirm"}
            ]"#,
        );

        let report = runner.report();
        assert!(!report.visible);
        assert!(report.widgets.is_empty());
        assert!(!runner.area().store().widgets_enabled());
    }

    #[test]
    fn test_disabled_widgets_notice() {
        let (_, mut runner) = runner();
        run(&mut runner, r#"[{"command": "add_widget"}, {"command": "picker_result", "provider": "x"}]"#);

        let report = runner.report();
        assert_eq!(report.notices, vec![Notice::WidgetsDisabled.to_string()]);
        assert!(report.widgets.is_empty());
    }
}
