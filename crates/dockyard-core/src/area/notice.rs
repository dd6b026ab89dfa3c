//! Transient messages for the user.

use crate::host::WidgetId;
use std::fmt;

/// A short-lived message the shell shows to the user (e.g. a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Adding was attempted while widgets are switched off.
    WidgetsDisabled,
    /// The picker could not be started.
    PickerUnavailable,
    /// A widget was placed; carries the provider label.
    WidgetAdded(String),
    /// The id is no longer backed by an installed provider.
    NotInstalled(WidgetId),
    /// The platform could not produce a view for the id.
    ViewCreationFailed(WidgetId),
    /// How to resize and move widgets, shown with the first widget.
    ResizeHelp,
    /// How to add a widget, shown while the area is empty.
    AddWidgetHint,
    /// A management action found no widgets.
    NothingToManage,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WidgetsDisabled => write!(f, "Please enable widgets in settings first"),
            Notice::PickerUnavailable => write!(f, "Unable to open the widget picker"),
            Notice::WidgetAdded(label) => write!(f, "{} added", label),
            Notice::NotInstalled(_) => write!(f, "Widget not installed"),
            Notice::ViewCreationFailed(_) => write!(f, "Failed to create widget view"),
            Notice::ResizeHelp => write!(
                f,
                "Drag a widget to move it, drag its bottom-right corner to resize, long press to remove"
            ),
            Notice::AddWidgetHint => write!(f, "Long press the widget area to add a widget"),
            Notice::NothingToManage => write!(f, "No widgets to manage"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Notice::WidgetAdded("Clock".to_string()).to_string(), "Clock added");
        assert_eq!(Notice::NotInstalled(WidgetId(3)).to_string(), "Widget not installed");
    }
}
