use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{BandScale, Group, LinearScale};
use crate::interaction::HighlightState;
use crate::render::{ElementChange, Shape, Style, Surface, TextAnchor};

use super::BoxPlotConfig;
use super::entity_cache::{BandFrame, EntityCache, RenderedEntity};

/// Horizontal gap between a box edge and its labels.
pub const LABEL_OFFSET_PX: f64 = 6.0;

const LINE_WIDTH_PX: f64 = 1.0;

/// One drawable part of a box, carrying the data value(s) it depicts.
///
/// Geometry is derived on demand so the same glyph can be projected through
/// the previous scale (enter), the current one (update) or the current one
/// at zero opacity (exit).
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    CenterLine { low: f64, high: f64 },
    Box { q1: f64, q3: f64 },
    Median { value: f64 },
    /// `index` 0 is the low whisker, 1 the high one.
    Whisker { index: usize, value: f64 },
    /// One per quartile, `index` 0..=2.
    BoxLabel { index: usize, value: f64 },
    WhiskerLabel { index: usize, value: f64 },
    /// `index` points into the group's sorted values.
    Outlier { index: usize, value: f64 },
}

/// Inputs needed to turn a glyph into pixels.
#[derive(Debug, Clone, Copy)]
pub struct GlyphContext<'a> {
    pub frame: BandFrame,
    pub scale: LinearScale,
    pub config: &'a BoxPlotConfig,
    pub label_step: Option<f64>,
}

impl Glyph {
    /// Element key, unique within one entity.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::CenterLine { .. } => "center".to_owned(),
            Self::Box { .. } => "box".to_owned(),
            Self::Median { .. } => "median".to_owned(),
            Self::Whisker { index, .. } => format!("whisker-{index}"),
            Self::BoxLabel { index, .. } => format!("box-label-{index}"),
            Self::WhiskerLabel { index, .. } => format!("whisker-label-{index}"),
            Self::Outlier { index, .. } => format!("outlier-{index}"),
        }
    }

    /// Whether the glyph enters transparent and fades in.
    #[must_use]
    pub fn fades_in(&self) -> bool {
        matches!(
            self,
            Self::Whisker { .. } | Self::WhiskerLabel { .. } | Self::Outlier { .. }
        )
    }

    #[must_use]
    pub fn style(&self, config: &BoxPlotConfig) -> Style {
        match self {
            Self::Box { .. } | Self::Outlier { .. } => {
                Style::filled(config.fill_color(), config.stroke_color(), LINE_WIDTH_PX)
            }
            Self::CenterLine { .. } | Self::Median { .. } | Self::Whisker { .. } => {
                Style::stroke(config.stroke_color(), LINE_WIDTH_PX)
            }
            Self::BoxLabel { .. } | Self::WhiskerLabel { .. } => {
                Style::text(config.stroke_color(), config.label_font_size_px())
            }
        }
    }

    #[must_use]
    pub fn shape(&self, context: &GlyphContext<'_>) -> Shape {
        let GlyphContext {
            frame,
            scale,
            config,
            label_step,
        } = *context;
        let label = |value: f64| config.tick_format().format(value, label_step);

        match *self {
            Self::CenterLine { low, high } => {
                let x = frame.center();
                Shape::line(x, scale.map(low), x, scale.map(high))
            }
            Self::Box { q1, q3 } => {
                let top = scale.map(q3);
                let bottom = scale.map(q1);
                Shape::rect(frame.start, top.min(bottom), frame.width, (bottom - top).abs())
            }
            Self::Median { value } | Self::Whisker { value, .. } => {
                let y = scale.map(value);
                Shape::line(frame.start, y, frame.end(), y)
            }
            Self::BoxLabel { index, value } => {
                let (x, anchor) = if index == 1 {
                    (frame.end() + LABEL_OFFSET_PX, TextAnchor::Start)
                } else {
                    (frame.start - LABEL_OFFSET_PX, TextAnchor::End)
                };
                Shape::text(x, scale.map(value), label(value), anchor)
            }
            Self::WhiskerLabel { value, .. } => Shape::text(
                frame.end() + LABEL_OFFSET_PX,
                scale.map(value),
                label(value),
                TextAnchor::Start,
            ),
            Self::Outlier { value, .. } => {
                Shape::circle(frame.center(), scale.map(value), config.outlier_radius_px())
            }
        }
    }
}

/// Glyphs describing `group`, in drawing order.
#[must_use]
pub fn glyphs_for(group: &Group, show_labels: bool) -> SmallVec<[Glyph; 16]> {
    let [q1, median, q3] = group.quartiles();
    let whiskers = group.whisker_values();
    let mut glyphs = SmallVec::new();

    if let Some((low, high)) = whiskers {
        glyphs.push(Glyph::CenterLine { low, high });
    }
    glyphs.push(Glyph::Box { q1, q3 });
    glyphs.push(Glyph::Median { value: median });
    if let Some((low, high)) = whiskers {
        glyphs.push(Glyph::Whisker {
            index: 0,
            value: low,
        });
        glyphs.push(Glyph::Whisker {
            index: 1,
            value: high,
        });
    }
    if show_labels {
        for (index, value) in group.quartiles().into_iter().enumerate() {
            glyphs.push(Glyph::BoxLabel { index, value });
        }
        if let Some((low, high)) = whiskers {
            glyphs.push(Glyph::WhiskerLabel {
                index: 0,
                value: low,
            });
            glyphs.push(Glyph::WhiskerLabel {
                index: 1,
                value: high,
            });
        }
    }
    for (index, value) in group.outliers() {
        glyphs.push(Glyph::Outlier { index, value });
    }
    glyphs
}

/// Stable entity class derived from a group name.
///
/// Characters outside `[A-Za-z0-9_-]` become `-`, so the class is usable as
/// an element id. Distinct names can share a class; see [`unique_entity_id`].
#[must_use]
pub fn entity_class(name: &str) -> String {
    let mut class = String::with_capacity(name.len() + 4);
    class.push_str("box-");
    class.extend(name.chars().map(|ch| {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            ch
        } else {
            '-'
        }
    }));
    class
}

/// Id for a new entity named `name`: its [`entity_class`], suffixed with
/// `-2`, `-3`, ... while another entity on `surface` already uses it.
#[must_use]
pub fn unique_entity_id(name: &str, surface: &Surface) -> String {
    let base = entity_class(name);
    let taken = |id: &str| surface.entities().any(|node| node.id() == id);
    if !taken(&base) {
        return base;
    }
    let mut suffix = 2usize;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Element counts of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
    pub entities_entered: usize,
    pub entities_exited: usize,
}

impl RenderReport {
    pub(crate) fn absorb(&mut self, other: RenderReport) {
        self.entered += other.entered;
        self.updated += other.updated;
        self.exited += other.exited;
        self.entities_entered += other.entities_entered;
        self.entities_exited += other.entities_exited;
    }
}

/// Scales and settings shared by every entity of one pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoxPass<'a> {
    pub bands: &'a BandScale,
    pub scale: LinearScale,
    pub config: &'a BoxPlotConfig,
    pub highlight: &'a HighlightState,
    pub label_step: Option<f64>,
}

/// Reconciles entity groups on `surface` with `groups`.
///
/// Departed names exit every glyph toward the new scale; present names
/// enter from their cached previous scale (or the unbounded one) and update
/// from wherever their elements currently are.
pub(crate) fn render_boxes(
    surface: &mut Surface,
    cache: &mut EntityCache,
    groups: &[Group],
    pass: &BoxPass<'_>,
) -> RenderReport {
    let BoxPass {
        bands,
        scale,
        config,
        highlight,
        label_step,
    } = *pass;
    let transition = config.transition();
    let names: Vec<&str> = groups.iter().map(Group::name).collect();
    let mut report = RenderReport::default();

    let departed: Vec<String> = cache
        .names()
        .filter(|name| !names.contains(name))
        .map(str::to_owned)
        .collect();
    for name in departed {
        let Some(entity) = cache.remove(&name) else {
            continue;
        };
        if let Some(node) = surface.entity_mut(&name) {
            let context = GlyphContext {
                frame: entity.frame,
                scale,
                config,
                label_step,
            };
            for (key, glyph) in &entity.glyphs {
                if node.exit(key, Some(glyph.shape(&context)), transition) {
                    report.exited += 1;
                }
            }
        }
        surface.mark_entity_exiting(&name);
        report.entities_exited += 1;
        debug!(name = %name, "entity exiting");
    }

    for group in groups {
        let name = group.name();
        let Some(start) = bands.band_start(name) else {
            warn!(name = %name, "group has no band; entity skipped");
            continue;
        };
        let frame = BandFrame {
            start,
            width: bands.band_width(),
        };

        let previous = cache.previous_scale_for(name, scale.range());
        let (id, previous_glyphs) = match cache.remove(name) {
            Some(entity) => (entity.id, entity.glyphs),
            None => {
                report.entities_entered += 1;
                let id = surface
                    .entity(name)
                    .map(|node| node.id().to_owned())
                    .unwrap_or_else(|| unique_entity_id(name, surface));
                if id != entity_class(name) {
                    debug!(name = %name, id = %id, "entity class already taken; id suffixed");
                }
                (id, IndexMap::new())
            }
        };

        let node = surface.entity_entry(name, &id);
        node.fade_to(
            highlight.opacity_for(name, config.dimmed_opacity()),
            transition,
        );

        let enter_context = GlyphContext {
            frame,
            scale: previous,
            config,
            label_step,
        };
        let context = GlyphContext {
            scale,
            ..enter_context
        };

        let glyphs = glyphs_for(group, config.show_labels());
        let mut drawn = IndexMap::with_capacity(glyphs.len());
        for glyph in glyphs {
            let key = glyph.key();
            let enter_opacity = if glyph.fades_in() { 0.0 } else { 1.0 };
            let change = node.upsert(
                &key,
                glyph.style(config),
                (glyph.shape(&enter_context), enter_opacity),
                glyph.shape(&context),
                transition,
            );
            match change {
                ElementChange::Entered => report.entered += 1,
                ElementChange::Updated => report.updated += 1,
            }
            drawn.insert(key, glyph);
        }

        for (key, glyph) in previous_glyphs {
            if !drawn.contains_key(&key) && node.exit(&key, Some(glyph.shape(&context)), transition)
            {
                report.exited += 1;
            }
        }

        trace!(name = %name, elements = drawn.len(), "entity reconciled");
        cache.insert(
            name,
            RenderedEntity {
                id,
                scale,
                frame,
                glyphs: drawn,
            },
        );
    }

    surface.order_entities(&names);
    report
}

#[cfg(test)]
mod tests {
    use super::{entity_class, unique_entity_id};
    use crate::core::{Margin, Viewport};
    use crate::render::Surface;

    #[test]
    fn entity_class_replaces_unsafe_characters() {
        assert_eq!(entity_class("Sales Q1"), "box-Sales-Q1");
        assert_eq!(entity_class("a_b-c"), "box-a_b-c");
    }

    #[test]
    fn unique_entity_id_suffixes_taken_classes() {
        let mut surface = Surface::new("chart", Viewport::new(400, 300), Margin::DEFAULT);
        assert_eq!(unique_entity_id("a b", &surface), "box-a-b");
        surface.entity_entry("a b", "box-a-b");
        assert_eq!(unique_entity_id("a-b", &surface), "box-a-b-2");
        surface.entity_entry("a-b", "box-a-b-2");
        assert_eq!(unique_entity_id("a.b", &surface), "box-a-b-3");
    }
}
