use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::{BandScale, LinearScale};
use crate::render::{ElementChange, GroupNode, Shape, Style, Surface, TextAnchor, TransitionSpec};

use super::BoxPlotConfig;
use super::box_renderer::{LABEL_OFFSET_PX, RenderReport};
use super::entity_cache::EntityCache;

pub const X_AXIS_ID: &str = "x-axis";
pub const Y_AXIS_ID: &str = "y-axis";

const TICK_SIZE_PX: f64 = 6.0;
const TICK_SPACING_PX: f64 = 40.0;
const MIN_TICKS: usize = 2;
const MAX_TICKS: usize = 10;

/// Target number of value ticks for a plot of `plot_height` pixels.
#[must_use]
pub fn tick_count(plot_height: f64) -> usize {
    if !plot_height.is_finite() || plot_height <= 0.0 {
        return MIN_TICKS;
    }
    ((plot_height / TICK_SPACING_PX).round() as usize).clamp(MIN_TICKS, MAX_TICKS)
}

fn tick_key(value: f64) -> String {
    format!("tick-{}", OrderedFloat(value))
}

fn tick_label_key(value: f64) -> String {
    format!("tick-label-{}", OrderedFloat(value))
}

fn category_key(name: &str) -> String {
    format!("label-{name}")
}

fn tally(report: &mut RenderReport, change: ElementChange) {
    match change {
        ElementChange::Entered => report.entered += 1,
        ElementChange::Updated => report.updated += 1,
    }
}

fn upsert_settled(
    node: &mut GroupNode,
    key: &str,
    style: Style,
    shape: Shape,
    transition: TransitionSpec,
) -> ElementChange {
    node.upsert(key, style, (shape.clone(), 1.0), shape, transition)
}

/// Inputs of one axis pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisPass<'a> {
    pub bands: &'a BandScale,
    pub scale: LinearScale,
    pub config: &'a BoxPlotConfig,
    pub ticks: &'a [f64],
    pub label_step: Option<f64>,
}

/// Reconciles the category and value axes.
///
/// Category labels are keyed by group name and value ticks by tick value,
/// so both follow the same enter/update/exit model as the boxes.
pub(crate) fn render_axes(
    surface: &mut Surface,
    cache: &mut EntityCache,
    pass: &AxisPass<'_>,
) -> RenderReport {
    let mut report = RenderReport::default();
    render_category_axis(surface, cache, pass, &mut report);
    render_value_axis(surface, cache, pass, &mut report);
    trace!(
        entered = report.entered,
        updated = report.updated,
        exited = report.exited,
        "axes reconciled"
    );
    report
}

fn render_category_axis(
    surface: &mut Surface,
    cache: &mut EntityCache,
    pass: &AxisPass<'_>,
    report: &mut RenderReport,
) {
    let transition = pass.config.transition();
    let line_style = Style::stroke(pass.config.stroke_color(), 1.0);
    let text_style = Style::text(pass.config.stroke_color(), pass.config.label_font_size_px());
    let width = surface.plot_width();
    let height = surface.plot_height();
    let label_y = height + 2.0 * LABEL_OFFSET_PX;

    let node = surface.axis_mut(X_AXIS_ID);
    let baseline = Shape::line(0.0, height, width, height);
    tally(
        report,
        upsert_settled(node, "baseline", line_style, baseline, transition),
    );

    let mut placed = IndexMap::with_capacity(pass.bands.len());
    for name in pass.bands.domain() {
        let Some(center) = pass.bands.band_center(name) else {
            continue;
        };
        let from_x = cache.axis.categories.get(name).copied().unwrap_or(center);
        let key = category_key(name);
        let change = node.upsert(
            &key,
            text_style,
            (Shape::text(from_x, label_y, name, TextAnchor::Middle), 0.0),
            Shape::text(center, label_y, name, TextAnchor::Middle),
            transition,
        );
        tally(report, change);
        placed.insert(name.to_owned(), center);
    }

    for name in cache.axis.categories.keys() {
        if !placed.contains_key(name) && node.exit(&category_key(name), None, transition) {
            report.exited += 1;
        }
    }
    cache.axis.categories = placed;
}

fn render_value_axis(
    surface: &mut Surface,
    cache: &mut EntityCache,
    pass: &AxisPass<'_>,
    report: &mut RenderReport,
) {
    let config = pass.config;
    let transition = config.transition();
    let line_style = Style::stroke(config.stroke_color(), 1.0);
    let text_style = Style::text(config.stroke_color(), config.label_font_size_px());
    let height = surface.plot_height();
    let scale = pass.scale;
    let previous = cache.axis.scale.unwrap_or_else(|| {
        let (low, high) = scale.range();
        LinearScale::unbounded(low, high)
    });

    let tick_line = |value: f64, scale: LinearScale| {
        let y = scale.map(value);
        Shape::line(-TICK_SIZE_PX, y, 0.0, y)
    };
    let tick_label = |value: f64, scale: LinearScale| {
        Shape::text(
            -(TICK_SIZE_PX + 3.0),
            scale.map(value),
            config.tick_format().format(value, pass.label_step),
            TextAnchor::End,
        )
    };

    let node = surface.axis_mut(Y_AXIS_ID);
    tally(
        report,
        upsert_settled(
            node,
            "baseline",
            line_style,
            Shape::line(0.0, 0.0, 0.0, height),
            transition,
        ),
    );

    let mut placed = IndexSet::with_capacity(pass.ticks.len());
    for &value in pass.ticks {
        let change = node.upsert(
            &tick_key(value),
            line_style,
            (tick_line(value, previous), 0.0),
            tick_line(value, scale),
            transition,
        );
        tally(report, change);
        let change = node.upsert(
            &tick_label_key(value),
            text_style,
            (tick_label(value, previous), 0.0),
            tick_label(value, scale),
            transition,
        );
        tally(report, change);
        placed.insert(OrderedFloat(value));
    }

    for &OrderedFloat(value) in &cache.axis.ticks {
        if placed.contains(&OrderedFloat(value)) {
            continue;
        }
        if node.exit(&tick_key(value), Some(tick_line(value, scale)), transition) {
            report.exited += 1;
        }
        if node.exit(
            &tick_label_key(value),
            Some(tick_label(value, scale)),
            transition,
        ) {
            report.exited += 1;
        }
    }

    cache.axis.scale = Some(scale);
    cache.axis.ticks = placed;
}
