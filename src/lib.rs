//! boxplot-rs: animated box-and-whisker chart engine.
//!
//! Raw columns are summarized with the Tukey five-number method, mapped
//! through band and linear scales and reconciled onto a retained surface
//! with enter/update/exit transitions. Backends implement
//! [`render::Renderer`]; [`render::SvgRenderer`] emits SVG documents.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{BoxPlotConfig, ChartController, InitOptions, UpdateOptions, UpdateOutcome};
pub use error::{ChartError, ChartResult};
