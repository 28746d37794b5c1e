use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::extensions::PluginEvent;
use crate::render::Renderer;

use super::{ChartController, LifecycleState};

impl<R: Renderer> ChartController<R> {
    /// Toggles the highlight of `name` and returns its new flag.
    ///
    /// Entity opacities animate toward the derived policy: highlighted groups
    /// (or every group, when none is highlighted) at full opacity, the rest
    /// dimmed. No re-render of the data is involved.
    pub fn click_group(&mut self, name: &str) -> ChartResult<bool> {
        if self.state != LifecycleState::Rendered {
            return Err(ChartError::InvalidLifecycle {
                operation: "click",
                state: self.state.as_str(),
            });
        }
        if !self.groups().iter().any(|group| group.name() == name) {
            return Err(ChartError::InvalidInput(format!(
                "no rendered group named `{name}`"
            )));
        }

        let highlighted = self.highlight.toggle(name);
        self.apply_highlight();
        debug!(
            name = %name,
            highlighted,
            highlighted_len = self.highlight.len(),
            "group highlight toggled"
        );
        self.render_frame();
        self.emit_plugin_event(PluginEvent::HighlightChanged {
            name: name.to_owned(),
            highlighted,
        });
        Ok(highlighted)
    }

    /// Hit-tests viewport point `(x, y)` against box rects and outlier
    /// markers, toggling the topmost group found.
    pub fn click_at(&mut self, x: f64, y: f64) -> ChartResult<Option<bool>> {
        if self.state != LifecycleState::Rendered {
            return Err(ChartError::InvalidLifecycle {
                operation: "click",
                state: self.state.as_str(),
            });
        }
        let hit = self
            .surface
            .as_ref()
            .and_then(|surface| surface.hit_test(x, y))
            .map(str::to_owned);
        match hit {
            Some(name) => self.click_group(&name).map(Some),
            None => {
                debug!(x, y, "click missed every group");
                Ok(None)
            }
        }
    }

    #[must_use]
    pub fn is_highlighted(&self, name: &str) -> bool {
        self.highlight.is_highlighted(name)
    }

    pub fn highlighted_names(&self) -> impl Iterator<Item = &str> {
        self.highlight.names()
    }

    fn apply_highlight(&mut self) {
        let transition = self.config.transition();
        let dimmed = self.config.dimmed_opacity();
        let Some(state) = self.chart_state.as_mut() else {
            return;
        };
        for group in &mut state.groups {
            group.highlighted = self.highlight.is_highlighted(group.name());
            if let Some(surface) = self.surface.as_mut() {
                if let Some(node) = surface.entity_mut(group.name()) {
                    node.fade_to(self.highlight.opacity_for(group.name(), dimmed), transition);
                }
            }
        }
    }
}
