use tracing::trace;

use crate::core::Viewport;
use crate::extensions::{PluginContext, PluginEvent};
use crate::render::Renderer;

use super::ChartController;

impl<R: Renderer> ChartController<R> {
    pub(super) fn plugin_context(&self) -> PluginContext {
        let viewport = self
            .surface
            .as_ref()
            .map_or(Viewport::new(0, 0), |surface| surface.viewport());
        let value_domain = self
            .chart_state
            .as_ref()
            .and_then(|state| state.global_min.zip(state.global_max));
        PluginContext {
            state: self.state,
            viewport,
            groups_len: self.groups().len(),
            highlighted_len: self.highlight.len(),
            value_domain,
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: PluginEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        trace!(?event, plugins = self.plugins.len(), "dispatching plugin event");
        for plugin in &mut self.plugins {
            plugin.on_event(&event, context);
        }
    }
}
