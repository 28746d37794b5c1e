use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;

use crate::core::LinearScale;

use super::box_renderer::Glyph;

/// Horizontal placement of one rendered entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFrame {
    pub start: f64,
    pub width: f64,
}

impl BandFrame {
    #[must_use]
    pub fn center(self) -> f64 {
        self.start + self.width / 2.0
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.start + self.width
    }
}

/// What was last drawn for one group name.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntity {
    pub id: String,
    pub scale: LinearScale,
    pub frame: BandFrame,
    pub glyphs: IndexMap<String, Glyph>,
}

/// Axis state of the previous pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct AxisMemory {
    pub scale: Option<LinearScale>,
    pub ticks: IndexSet<OrderedFloat<f64>>,
    pub categories: IndexMap<String, f64>,
}

/// Rendering memory keyed by group name; replaces state stashed on drawn
/// nodes so transitions can start from the previous scale.
#[derive(Debug, Clone, Default)]
pub struct EntityCache {
    entities: IndexMap<String, RenderedEntity>,
    pub(crate) axis: AxisMemory,
}

impl EntityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale the entity was last drawn with, or the unbounded scale over
    /// `pixel_range` when it has never been drawn.
    #[must_use]
    pub fn previous_scale_for(&self, name: &str, pixel_range: (f64, f64)) -> LinearScale {
        self.entities.get(name).map_or_else(
            || LinearScale::unbounded(pixel_range.0, pixel_range.1),
            |entity| entity.scale,
        )
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RenderedEntity> {
        self.entities.get(name)
    }

    pub fn insert(&mut self, name: &str, entity: RenderedEntity) {
        self.entities.insert(name.to_owned(), entity);
    }

    pub fn remove(&mut self, name: &str) -> Option<RenderedEntity> {
        self.entities.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.axis = AxisMemory::default();
    }
}
