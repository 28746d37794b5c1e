use serde::{Deserialize, Serialize};

use crate::api::LifecycleState;
use crate::core::Viewport;

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub state: LifecycleState,
    pub viewport: Viewport,
    pub groups_len: usize,
    pub highlighted_len: usize,
    pub value_domain: Option<(f64, f64)>,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PluginEvent {
    Initialized,
    DataUpdated { groups_len: usize },
    HighlightChanged { name: String, highlighted: bool },
    TransitionsSettled,
    Rendered,
    Destroyed,
}

/// Extension hook interface for bounded custom logic.
///
/// Highlight changes reach the host through this trait; the host decides
/// whether to persist or forward them.
pub trait ChartPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &PluginEvent, context: PluginContext);
}
