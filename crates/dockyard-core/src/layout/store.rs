//! Widget area state on top of a preference store.

use super::codec::{self, EMPTY_ENCODING};
use super::{LayoutPreset, PositionMap, PositionState, SizeMap, SizeState, WidgetGeometry};
use crate::host::WidgetId;
use crate::storage::{PrefBatch, PreferenceStore, StorageResult};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Preference keys owned by the widget area.
pub mod keys {
    pub const WIDGET_IDS: &str = "widget_ids";
    pub const WIDGET_SIZES: &str = "widget_sizes";
    pub const WIDGET_POSITIONS: &str = "widget_positions";
    pub const WIDGETS_ENABLED: &str = "widgets_enabled";
    pub const WIDGET_POSITION: &str = "widget_position";
}

/// Reads and writes the persisted widget area state.
///
/// Reads never fail: a missing or unreadable value is its default. Writes
/// that touch more than one key go out as a single batch.
#[derive(Clone)]
pub struct LayoutStore {
    prefs: Arc<dyn PreferenceStore>,
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore").finish_non_exhaustive()
    }
}

impl LayoutStore {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    /// Whether the user enabled widgets at all.
    pub fn widgets_enabled(&self) -> bool {
        match self.prefs.get_flag(keys::WIDGETS_ENABLED) {
            Ok(enabled) => enabled.unwrap_or(false),
            Err(e) => {
                log::warn!("Failed to read widgets-enabled flag: {}", e);
                false
            }
        }
    }

    pub fn set_widgets_enabled(&self, enabled: bool) -> StorageResult<()> {
        self.prefs.apply(PrefBatch::new().flag(keys::WIDGETS_ENABLED, enabled))
    }

    /// The stored layout preset.
    pub fn preset(&self) -> LayoutPreset {
        match self.prefs.get_int(keys::WIDGET_POSITION) {
            Ok(index) => index.map(LayoutPreset::from_index).unwrap_or_default(),
            Err(e) => {
                log::warn!("Failed to read widget position preset: {}", e);
                LayoutPreset::default()
            }
        }
    }

    pub fn set_preset(&self, preset: LayoutPreset) -> StorageResult<()> {
        self.prefs.apply(PrefBatch::new().int(keys::WIDGET_POSITION, preset.index()))
    }

    /// The persisted id set exactly as stored.
    pub fn raw_widget_ids(&self) -> BTreeSet<String> {
        match self.prefs.get_string_set(keys::WIDGET_IDS) {
            Ok(ids) => ids.unwrap_or_default(),
            Err(e) => {
                log::warn!("Failed to read widget ids: {}", e);
                BTreeSet::new()
            }
        }
    }

    /// The persisted id set, skipping entries that are not ids.
    pub fn widget_ids(&self) -> Vec<WidgetId> {
        self.raw_widget_ids()
            .iter()
            .filter_map(|raw| match raw.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    log::debug!("Skipping stored widget id '{}'", raw);
                    None
                }
            })
            .collect()
    }

    pub fn sizes(&self) -> SizeMap {
        codec::decode_sizes(&self.read_encoded(keys::WIDGET_SIZES))
    }

    pub fn positions(&self) -> PositionMap {
        codec::decode_positions(&self.read_encoded(keys::WIDGET_POSITIONS))
    }

    /// Saved size and position of one widget, each if present.
    pub fn saved_layout(&self, id: WidgetId) -> (Option<SizeState>, Option<PositionState>) {
        (self.sizes().get(&id).copied(), self.positions().get(&id).copied())
    }

    /// Persist the final geometry of a gesture.
    pub fn save_geometry(&self, id: WidgetId, geometry: WidgetGeometry) -> StorageResult<()> {
        let mut sizes = self.sizes();
        let mut positions = self.positions();
        sizes.insert(id, geometry.size);
        positions.insert(id, geometry.position);

        self.prefs.apply(
            PrefBatch::new()
                .text(keys::WIDGET_SIZES, codec::encode_sizes(&sizes))
                .text(keys::WIDGET_POSITIONS, codec::encode_positions(&positions)),
        )
    }

    /// Add an id to the persisted set.
    pub fn add_id(&self, id: WidgetId) -> StorageResult<()> {
        let mut ids = self.raw_widget_ids();
        if !ids.insert(id.to_string()) {
            return Ok(());
        }
        self.prefs.apply(PrefBatch::new().string_set(keys::WIDGET_IDS, ids))
    }

    /// Remove an id from the set and both layout maps in one write.
    pub fn purge(&self, id: WidgetId) -> StorageResult<()> {
        let mut ids = self.raw_widget_ids();
        let mut sizes = self.sizes();
        let mut positions = self.positions();
        ids.remove(&id.to_string());
        sizes.remove(&id);
        positions.remove(&id);

        self.prefs.apply(
            PrefBatch::new()
                .string_set(keys::WIDGET_IDS, ids)
                .text(keys::WIDGET_SIZES, codec::encode_sizes(&sizes))
                .text(keys::WIDGET_POSITIONS, codec::encode_positions(&positions)),
        )
    }

    /// Reset both layout maps to empty and turn widgets off.
    pub fn reset_and_disable(&self) -> StorageResult<()> {
        self.prefs.apply(
            PrefBatch::new()
                .text(keys::WIDGET_SIZES, EMPTY_ENCODING)
                .text(keys::WIDGET_POSITIONS, EMPTY_ENCODING)
                .flag(keys::WIDGETS_ENABLED, false),
        )
    }

    fn read_encoded(&self, key: &str) -> String {
        match self.prefs.get_text(key) {
            Ok(value) => value.unwrap_or_else(|| EMPTY_ENCODING.to_string()),
            Err(e) => {
                log::warn!("Failed to read {}: {}", key, e);
                EMPTY_ENCODING.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryPreferences, PrefValue};

    fn store() -> (Arc<MemoryPreferences>, LayoutStore) {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = LayoutStore::new(prefs.clone());
        (prefs, store)
    }

    #[test]
    fn test_defaults_when_unset() {
        let (_, store) = store();
        assert!(!store.widgets_enabled());
        assert_eq!(store.preset(), LayoutPreset::Top);
        assert!(store.widget_ids().is_empty());
        assert!(store.sizes().is_empty());
        assert!(store.positions().is_empty());
    }

    #[test]
    fn test_save_geometry() {
        let (prefs, store) = store();
        let geometry = WidgetGeometry::new(SizeState::new(200, 300), PositionState::new(5, 15));
        store.save_geometry(WidgetId(5), geometry).unwrap();

        assert_eq!(
            store.saved_layout(WidgetId(5)),
            (Some(SizeState::new(200, 300)), Some(PositionState::new(5, 15)))
        );
        assert_eq!(
            prefs.get_text(keys::WIDGET_SIZES).unwrap().as_deref(),
            Some(r#"{"5":{"width":200,"height":300}}"#)
        );
    }

    #[test]
    fn test_purge_removes_from_all_structures() {
        let (_, store) = store();
        for id in [3, 5, 7] {
            store.add_id(WidgetId(id)).unwrap();
            store
                .save_geometry(
                    WidgetId(id),
                    WidgetGeometry::new(SizeState::new(200 + id, 300), PositionState::new(id, 0)),
                )
                .unwrap();
        }

        store.purge(WidgetId(5)).unwrap();

        assert_eq!(store.widget_ids(), vec![WidgetId(3), WidgetId(7)]);
        assert!(!store.sizes().contains_key(&WidgetId(5)));
        assert!(!store.positions().contains_key(&WidgetId(5)));
        assert_eq!(store.sizes().get(&WidgetId(3)), Some(&SizeState::new(203, 300)));
        assert_eq!(store.positions().get(&WidgetId(7)), Some(&PositionState::new(7, 0)));
    }

    #[test]
    fn test_reset_and_disable() {
        let (prefs, store) = store();
        store.set_widgets_enabled(true).unwrap();
        store
            .save_geometry(WidgetId(1), WidgetGeometry::new(SizeState::new(300, 500), PositionState::new(0, 0)))
            .unwrap();

        store.reset_and_disable().unwrap();

        assert!(!store.widgets_enabled());
        assert_eq!(prefs.get_text(keys::WIDGET_SIZES).unwrap().as_deref(), Some("{}"));
        assert_eq!(prefs.get_text(keys::WIDGET_POSITIONS).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_unparsable_ids_are_skipped() {
        let (prefs, store) = store();
        let raw = ["4".to_string(), "garbage".to_string()].into_iter().collect();
        prefs.put(keys::WIDGET_IDS, PrefValue::Set(raw)).unwrap();

        assert_eq!(store.widget_ids(), vec![WidgetId(4)]);
    }

    #[test]
    fn test_malformed_stored_maps_read_empty() {
        let (prefs, store) = store();
        prefs.put(keys::WIDGET_SIZES, PrefValue::Text("{".to_string())).unwrap();
        prefs.put(keys::WIDGET_POSITIONS, PrefValue::Bool(true)).unwrap();

        assert!(store.sizes().is_empty());
        assert!(store.positions().is_empty());
    }

    #[test]
    fn test_preset_persistence() {
        let (prefs, store) = store();
        store.set_preset(LayoutPreset::Bottom).unwrap();
        assert_eq!(store.preset(), LayoutPreset::Bottom);
        assert_eq!(prefs.get_int(keys::WIDGET_POSITION).unwrap(), Some(2));
    }
}
