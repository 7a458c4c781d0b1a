//! Explicit analytics registry
//!
//! The host-side glue: owns the registered plugins, delivers events to the
//! active ones sequentially, and records every published event so plugins
//! registering late can replay what they missed. An owned registry object
//! passed by reference -- there is no ambient global state.

use crate::plugin::AnalyticsPlugin;
use crate::types::PluginId;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

/// A previously published event, kept for late-registering plugins
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub name: String,
    pub params: Vec<Value>,
    pub timestamp: DateTime<Utc>,
}

impl RecordedEvent {
    pub fn new(name: &str, params: Vec<Value>) -> Self {
        Self {
            name: name.to_owned(),
            params,
            timestamp: Utc::now(),
        }
    }
}

/// Registry of analytics plugins with sequential event delivery
#[derive(Default)]
pub struct AnalyticsRegistry {
    plugins: Vec<Box<dyn AnalyticsPlugin>>,
    recorded: Vec<RecordedEvent>,
}

impl AnalyticsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin: assigns its ID and replays recorded history
    /// through its `init`.
    pub fn register(&mut self, mut plugin: Box<dyn AnalyticsPlugin>) -> PluginId {
        let id = PluginId::new();
        plugin.set_plugin_id(id);
        info!(plugin = plugin.name(), %id, "registering analytics plugin");
        plugin.init(&self.recorded);
        self.plugins.push(plugin);
        id
    }

    /// Destroy and remove one plugin. Returns false for unknown IDs.
    pub fn unregister(&mut self, id: PluginId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let mut plugin = self.plugins.remove(index);
        plugin.destroy();
        true
    }

    pub fn plugin_ids(&self) -> Vec<PluginId> {
        self.plugins.iter().filter_map(|p| p.plugin_id()).collect()
    }

    pub fn is_active(&self, id: PluginId) -> bool {
        self.position(id)
            .map(|i| self.plugins[i].is_active())
            .unwrap_or(false)
    }

    pub fn make_active(&mut self, id: PluginId) -> bool {
        self.with_plugin(id, |p| p.make_active())
    }

    pub fn make_inactive(&mut self, id: PluginId) -> bool {
        self.with_plugin(id, |p| p.make_inactive())
    }

    /// Publish one event: record it, then deliver to each active plugin in
    /// registration order. Delivery is synchronous; a plugin returns
    /// before the next one is called.
    pub fn publish(&mut self, name: &str, params: &[Value]) {
        debug!(event = name, "publishing analytics event");
        self.recorded.push(RecordedEvent::new(name, params.to_vec()));
        for plugin in &mut self.plugins {
            if plugin.is_active() {
                plugin.process_event(name, params);
            }
        }
    }

    /// Route per-plugin metadata, keyed by plugin name
    pub fn set_plugin_metadata(&mut self, metadata: &Value) {
        for plugin in &mut self.plugins {
            if let Some(section) = metadata.get(plugin.name()) {
                plugin.set_metadata(section);
            }
        }
    }

    /// Events recorded so far (what a late registrant would replay)
    pub fn recorded_events(&self) -> &[RecordedEvent] {
        &self.recorded
    }

    /// Destroy every plugin and drop the registry state
    pub fn destroy(&mut self) {
        for plugin in &mut self.plugins {
            plugin.destroy();
        }
        self.plugins.clear();
        self.recorded.clear();
    }

    fn position(&self, id: PluginId) -> Option<usize> {
        self.plugins.iter().position(|p| p.plugin_id() == Some(id))
    }

    fn with_plugin(&mut self, id: PluginId, f: impl FnOnce(&mut dyn AnalyticsPlugin)) -> bool {
        match self.position(id) {
            Some(index) => {
                f(self.plugins[index].as_mut());
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for AnalyticsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsRegistry")
            .field("plugins", &self.plugins.len())
            .field("recorded", &self.recorded.len())
            .finish()
    }
}
