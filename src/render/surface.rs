use std::time::Duration;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::{Margin, Viewport};
use crate::error::ChartResult;
use crate::render::{Shape, Style, TransitionSpec, Tweened};

/// Outcome of reconciling one element key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementChange {
    Entered,
    Updated,
}

/// One drawn primitive with animated geometry and opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    key: String,
    style: Style,
    shape: Tweened<Shape>,
    opacity: Tweened<f64>,
    exiting: bool,
}

impl Element {
    fn new(key: String, style: Style, shape: Shape, opacity: f64) -> Self {
        Self {
            key,
            style,
            shape: Tweened::new(shape),
            opacity: Tweened::new(opacity),
            exiting: false,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Geometry as of the last animation step.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        self.shape.current()
    }

    /// Geometry the element settles at once its transition completes.
    #[must_use]
    pub fn target_shape(&self) -> &Shape {
        self.shape.target()
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        *self.opacity.current()
    }

    #[must_use]
    pub fn target_opacity(&self) -> f64 {
        *self.opacity.target()
    }

    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.shape.is_animating() || self.opacity.is_animating()
    }

    fn retarget(&mut self, shape: Shape, opacity: f64, transition: TransitionSpec) {
        self.shape.retarget(shape, transition);
        self.opacity.retarget(opacity, transition);
    }

    fn advance(&mut self, dt: Duration) -> bool {
        let shape_done = self.shape.advance(dt);
        let opacity_done = self.opacity.advance(dt);
        shape_done && opacity_done
    }

    fn finish(&mut self) {
        self.shape.finish();
        self.opacity.finish();
    }
}

/// Drawing group: the axis groups and one node per rendered box.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    id: String,
    name: String,
    opacity: Tweened<f64>,
    elements: IndexMap<String, Element>,
    exiting: bool,
}

impl GroupNode {
    fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            opacity: Tweened::new(1.0),
            elements: IndexMap::new(),
            exiting: false,
        }
    }

    /// Stable identifier derived from the group name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        *self.opacity.current()
    }

    #[must_use]
    pub fn target_opacity(&self) -> f64 {
        *self.opacity.target()
    }

    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    #[must_use]
    pub fn element(&self, key: &str) -> Option<&Element> {
        self.elements.get(key)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Elements that are not on their way out.
    pub fn live_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(|element| !element.exiting)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Animates the whole group's opacity.
    pub fn fade_to(&mut self, opacity: f64, transition: TransitionSpec) {
        self.opacity.retarget(opacity, transition);
    }

    /// Enter-or-update one element.
    ///
    /// A missing element is created at `enter_from` (geometry, opacity) and
    /// then animated toward `shape`; an existing one (exiting included) is
    /// re-targeted from wherever it currently is.
    pub fn upsert(
        &mut self,
        key: &str,
        style: Style,
        enter_from: (Shape, f64),
        shape: Shape,
        transition: TransitionSpec,
    ) -> ElementChange {
        let change = match self.elements.get_mut(key) {
            Some(element) => {
                element.style = style;
                element.exiting = false;
                ElementChange::Updated
            }
            None => {
                let (from_shape, from_opacity) = enter_from;
                self.elements.insert(
                    key.to_owned(),
                    Element::new(key.to_owned(), style, from_shape, from_opacity),
                );
                ElementChange::Entered
            }
        };

        if let Some(element) = self.elements.get_mut(key) {
            element.retarget(shape, 1.0, transition);
        }
        change
    }

    /// Animates an element toward `shape` at zero opacity and removes it
    /// once the transition completes. Returns `false` for unknown keys.
    pub fn exit(&mut self, key: &str, shape: Option<Shape>, transition: TransitionSpec) -> bool {
        let Some(element) = self.elements.get_mut(key) else {
            return false;
        };
        let target = shape.unwrap_or_else(|| element.shape.target().clone());
        element.exiting = true;
        element.retarget(target, 0.0, transition);
        true
    }

    /// Keys of elements that are not exiting.
    #[must_use]
    pub fn live_keys(&self) -> Vec<String> {
        self.live_elements().map(|element| element.key.clone()).collect()
    }

    fn advance(&mut self, dt: Duration) -> bool {
        let mut settled = self.opacity.advance(dt);
        for element in self.elements.values_mut() {
            settled &= element.advance(dt);
        }
        self.prune();
        settled
    }

    fn finish(&mut self) {
        self.opacity.finish();
        for element in self.elements.values_mut() {
            element.finish();
        }
        self.prune();
    }

    fn prune(&mut self) {
        self.elements
            .retain(|_, element| !(element.exiting && !element.is_animating()));
    }

    fn is_animating(&self) -> bool {
        self.opacity.is_animating() || self.elements.values().any(Element::is_animating)
    }
}

/// Retained drawable surface.
///
/// Mirrors an SVG tree: a root chart group translated by the margin, an axis
/// layer and one group per rendered entity keyed by group name. Geometry is
/// expressed in plot-area coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    element_id: String,
    viewport: Viewport,
    margin: Margin,
    axes: IndexMap<String, GroupNode>,
    entities: IndexMap<String, GroupNode>,
}

impl Surface {
    #[must_use]
    pub fn new(element_id: impl Into<String>, viewport: Viewport, margin: Margin) -> Self {
        Self {
            element_id: element_id.into(),
            viewport,
            margin,
            axes: IndexMap::new(),
            entities: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.margin.inner_width(self.viewport)
    }

    #[must_use]
    pub fn plot_height(&self) -> f64 {
        self.margin.inner_height(self.viewport)
    }

    /// Axis group `id`, created on first use.
    pub fn axis_mut(&mut self, id: &str) -> &mut GroupNode {
        self.axes
            .entry(id.to_owned())
            .or_insert_with(|| GroupNode::new(id.to_owned(), id.to_owned()))
    }

    #[must_use]
    pub fn axis(&self, id: &str) -> Option<&GroupNode> {
        self.axes.get(id)
    }

    pub fn axes(&self) -> impl Iterator<Item = &GroupNode> {
        self.axes.values()
    }

    /// Entity group for `name`, created on first use. An exiting group is
    /// revived so its elements can be re-targeted.
    pub fn entity_entry(&mut self, name: &str, id: &str) -> &mut GroupNode {
        let node = self
            .entities
            .entry(name.to_owned())
            .or_insert_with(|| GroupNode::new(id.to_owned(), name.to_owned()));
        node.exiting = false;
        node
    }

    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&GroupNode> {
        self.entities.get(name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut GroupNode> {
        self.entities.get_mut(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &GroupNode> {
        self.entities.values()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut GroupNode> {
        self.entities.values_mut()
    }

    /// Entity groups that are not being removed.
    pub fn live_entities(&self) -> impl Iterator<Item = &GroupNode> {
        self.entities.values().filter(|node| !node.exiting)
    }

    /// Marks an entity group for removal once its elements have exited.
    pub fn mark_entity_exiting(&mut self, name: &str) {
        if let Some(node) = self.entities.get_mut(name) {
            node.exiting = true;
        }
    }

    /// Reorders entity groups to follow `names`; groups not listed (exiting
    /// ones) keep their relative order at the end.
    pub fn order_entities(&mut self, names: &[&str]) {
        let mut ordered = IndexMap::with_capacity(self.entities.len());
        for name in names {
            if let Some(node) = self.entities.shift_remove(*name) {
                ordered.insert((*name).to_owned(), node);
            }
        }
        ordered.extend(self.entities.drain(..));
        self.entities = ordered;
    }

    /// Steps every transition by `dt`; returns `true` when nothing is left
    /// animating.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let mut settled = true;
        for node in self.axes.values_mut().chain(self.entities.values_mut()) {
            settled &= node.advance(dt);
        }
        self.prune();
        settled
    }

    /// Jumps every transition to its end state.
    pub fn finish_transitions(&mut self) {
        for node in self.axes.values_mut().chain(self.entities.values_mut()) {
            node.finish();
        }
        self.prune();
    }

    /// Drops finished exits and emptied exiting groups.
    pub fn prune(&mut self) {
        for node in self.axes.values_mut().chain(self.entities.values_mut()) {
            node.prune();
        }
        let before = self.entities.len();
        self.entities
            .retain(|_, node| !(node.exiting && node.elements.is_empty()));
        let removed = before - self.entities.len();
        if removed > 0 {
            trace!(removed, "exited entity groups removed");
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.axes
            .values()
            .chain(self.entities.values())
            .any(GroupNode::is_animating)
    }

    /// Name of the topmost live entity with a filled element under the
    /// viewport point `(x, y)`.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        let px = x - self.margin.left;
        let py = y - self.margin.top;
        self.entities
            .values()
            .rev()
            .filter(|node| !node.exiting)
            .find(|node| {
                node.live_elements()
                    .any(|element| element.shape().contains(px, py))
            })
            .map(GroupNode::name)
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.axes
            .values()
            .chain(self.entities.values())
            .map(GroupNode::len)
            .sum()
    }

    pub fn clear(&mut self) {
        self.axes.clear();
        self.entities.clear();
    }

    pub fn validate(&self) -> ChartResult<()> {
        for node in self.axes.values().chain(self.entities.values()) {
            for element in node.elements() {
                element.style.validate()?;
                element.shape().validate()?;
            }
        }
        Ok(())
    }
}
