mod axis_renderer;
mod box_renderer;
mod capabilities;
mod config;
mod controller;
mod entity_cache;
mod interaction_controller;
mod json_contract;
mod plugin_dispatch;
mod plugin_registry;

pub use axis_renderer::{X_AXIS_ID, Y_AXIS_ID, tick_count};
pub use box_renderer::{
    Glyph, GlyphContext, LABEL_OFFSET_PX, RenderReport, entity_class, glyphs_for,
    unique_entity_id,
};
pub use capabilities::{
    CapabilityObject, DataRole, DataRoleKind, ObjectProperty, PropertyType, TableMapping,
    VisualCapabilities, capabilities,
};
pub use config::{BoxPlotConfig, BoxPlotConfigBuilder, LabelFormatter, TickFormat};
pub use controller::{
    ChartController, ChartState, InitOptions, LifecycleState, SkipReason, UpdateOptions,
    UpdateOutcome,
};
pub use entity_cache::{BandFrame, EntityCache, RenderedEntity};
