//! In-process widget host.

use super::{HostError, HostResult, ProviderInfo, WidgetHost, WidgetId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// View handle produced by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryView {
    pub id: WidgetId,
    pub provider: String,
    pub label: String,
}

/// Widget host kept entirely in memory, for tests and headless runs.
///
/// Providers are installed and uninstalled explicitly, and [`MemoryHost::bind`]
/// plays the part of the platform picker binding a chosen provider to an id.
#[derive(Debug)]
pub struct MemoryHost {
    providers: BTreeMap<String, ProviderInfo>,
    /// Allocated ids and the provider bound to each.
    bindings: HashMap<WidgetId, Option<String>>,
    next_id: i32,
    listening: bool,
    start_calls: usize,
    stop_calls: usize,
    failing: bool,
    broken_views: HashSet<String>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            providers: BTreeMap::new(),
            bindings: HashMap::new(),
            next_id: 1,
            listening: false,
            start_calls: 0,
            stop_calls: 0,
            failing: false,
            broken_views: HashSet::new(),
        }
    }

    /// Install a widget provider.
    pub fn install(&mut self, info: ProviderInfo) {
        self.providers.insert(info.provider.clone(), info);
    }

    /// Uninstall a provider. Ids bound to it become unbound.
    pub fn uninstall(&mut self, provider: &str) {
        self.providers.remove(provider);
    }

    /// Bind an installed provider to an allocated id.
    pub fn bind(&mut self, id: WidgetId, provider: &str) -> HostResult<()> {
        if !self.providers.contains_key(provider) {
            return Err(HostError::ProviderMissing(provider.to_string()));
        }
        let slot = self.bindings.get_mut(&id).ok_or(HostError::UnknownId(id))?;
        *slot = Some(provider.to_string());
        Ok(())
    }

    /// Allocate an id and bind `provider` to it in one step.
    pub fn allocate_bound(&mut self, provider: &str) -> HostResult<WidgetId> {
        let id = self.allocate_id()?;
        self.bind(id, provider)?;
        Ok(id)
    }

    /// Make every host call fail, as a crashed platform service would.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Make view creation fail for one provider.
    pub fn break_views(&mut self, provider: &str) {
        self.broken_views.insert(provider.to_string());
    }

    pub fn is_allocated(&self, id: WidgetId) -> bool {
        self.bindings.contains_key(&id)
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls
    }

    fn check(&self) -> HostResult<()> {
        if self.failing {
            Err(HostError::Platform("widget service unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl WidgetHost for MemoryHost {
    type View = MemoryView;

    fn start_listening(&mut self) -> HostResult<()> {
        self.check()?;
        self.listening = true;
        self.start_calls += 1;
        Ok(())
    }

    fn stop_listening(&mut self) -> HostResult<()> {
        self.check()?;
        self.listening = false;
        self.stop_calls += 1;
        Ok(())
    }

    fn allocate_id(&mut self) -> HostResult<WidgetId> {
        self.check()?;
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.bindings.insert(id, None);
        Ok(id)
    }

    fn delete_id(&mut self, id: WidgetId) -> HostResult<()> {
        self.check()?;
        self.bindings.remove(&id);
        Ok(())
    }

    fn create_view(&mut self, id: WidgetId, info: &ProviderInfo) -> HostResult<MemoryView> {
        self.check()?;
        if !self.bindings.contains_key(&id) {
            return Err(HostError::UnknownId(id));
        }
        if !self.providers.contains_key(&info.provider) {
            return Err(HostError::ProviderMissing(info.provider.clone()));
        }
        if self.broken_views.contains(&info.provider) {
            return Err(HostError::Platform(format!("{} failed to inflate", info.provider)));
        }
        Ok(MemoryView {
            id,
            provider: info.provider.clone(),
            label: info.label.clone(),
        })
    }

    fn provider_info(&self, id: WidgetId) -> HostResult<Option<ProviderInfo>> {
        self.check()?;
        let provider = self.bindings.get(&id).and_then(|bound| bound.as_ref());
        Ok(provider.and_then(|name| self.providers.get(name)).cloned())
    }

    fn installed_providers(&self) -> HostResult<Vec<ProviderInfo>> {
        self.check()?;
        Ok(self.providers.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_requires_allocation_and_provider() {
        let mut host = MemoryHost::new();
        host.install(ProviderInfo::new("a", "A"));

        assert!(matches!(host.bind(WidgetId(1), "a"), Err(HostError::UnknownId(_))));
        let id = host.allocate_id().unwrap();
        assert!(matches!(host.bind(id, "b"), Err(HostError::ProviderMissing(_))));
        host.bind(id, "a").unwrap();
        assert_eq!(host.provider_info(id).unwrap().map(|p| p.label), Some("A".to_string()));
    }

    #[test]
    fn test_broken_views() {
        let mut host = MemoryHost::new();
        host.install(ProviderInfo::new("a", "A"));
        let id = host.allocate_bound("a").unwrap();
        let info = host.provider_info(id).unwrap().unwrap();

        host.break_views("a");
        assert!(matches!(host.create_view(id, &info), Err(HostError::Platform(_))));
    }

    #[test]
    fn test_delete_unbinds() {
        let mut host = MemoryHost::new();
        host.install(ProviderInfo::new("a", "A"));
        let id = host.allocate_bound("a").unwrap();

        host.delete_id(id).unwrap();
        assert!(!host.is_allocated(id));
        assert!(host.provider_info(id).unwrap().is_none());
    }
}
