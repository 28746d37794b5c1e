use crate::error::ChartResult;
use crate::render::{Renderer, Surface};

/// No-op renderer used by tests and headless chart usage.
///
/// It still validates the surface so tests catch invalid geometry without a
/// real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_group_count: usize,
    pub last_element_count: usize,
    pub render_count: u64,
}

impl Renderer for NullRenderer {
    fn render(&mut self, surface: &Surface) -> ChartResult<()> {
        surface.validate()?;
        self.last_group_count = surface.axes().count() + surface.entities().count();
        self.last_element_count = surface.element_count();
        self.render_count += 1;
        Ok(())
    }
}
