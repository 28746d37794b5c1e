use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartPlugin;
use crate::render::Renderer;

use super::{ChartController, LifecycleState};

impl<R: Renderer> ChartController<R> {
    /// Adds a plugin; ids must be non-blank and unique. A destroyed chart
    /// accepts no plugins.
    pub fn register_plugin(&mut self, plugin: Box<dyn ChartPlugin>) -> ChartResult<()> {
        if self.state == LifecycleState::Destroyed {
            return Err(ChartError::InvalidLifecycle {
                operation: "register_plugin",
                state: self.state.as_str(),
            });
        }
        let id = plugin.id();
        if id.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "plugin id must not be blank".to_owned(),
            ));
        }
        if self.has_plugin(id) {
            return Err(ChartError::InvalidData(format!(
                "plugin `{id}` is already registered"
            )));
        }

        debug!(plugin = %id, state = self.state.as_str(), "plugin registered");
        self.plugins.push(plugin);
        Ok(())
    }

    /// Returns `true` when a plugin with `plugin_id` was removed.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|plugin| plugin.id() != plugin_id);
        let removed = self.plugins.len() < before;
        if removed {
            debug!(plugin = %plugin_id, "plugin unregistered");
        }
        removed
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.id() == plugin_id)
    }
}
