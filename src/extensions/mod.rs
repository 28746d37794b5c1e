//! Extension points for host integrations.
//!
//! Plugins observe chart events; they never mutate controller internals.

mod plugins;

pub use plugins::{ChartPlugin, PluginContext, PluginEvent};
