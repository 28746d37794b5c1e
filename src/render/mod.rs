mod null_renderer;
mod primitives;
mod surface;
mod svg_renderer;
mod transition;

pub use null_renderer::NullRenderer;
pub use primitives::{Color, Shape, Style, TextAnchor};
pub use surface::{Element, ElementChange, GroupNode, Surface};
pub use svg_renderer::{SvgRenderStats, SvgRenderer};
pub use transition::{Easing, Interpolate, TransitionSpec, Tweened};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the retained `Surface` as of the latest animation step,
/// so drawing code stays isolated from data conversion and interaction.
pub trait Renderer {
    fn render(&mut self, surface: &Surface) -> ChartResult<()>;
}
