use std::fmt::{self, Write};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Element, GroupNode, Renderer, Shape, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub groups_drawn: usize,
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Serializes the surface into a standalone SVG document.
///
/// Every frame produces a complete document; the last one is kept for the
/// host to hand to its DOM or to write to disk.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
    last_stats: SvgRenderStats,
    frames: u64,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "svg"
    }

    /// Document produced by the most recent frame.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, surface: &Surface) -> ChartResult<()> {
        surface.validate()?;
        let mut stats = SvgRenderStats::default();
        let document = build_document(surface, &mut stats)
            .map_err(|err| map_backend_error("failed to serialize svg document", err))?;
        self.document = document;
        self.last_stats = stats;
        self.frames += 1;
        Ok(())
    }
}

fn build_document(surface: &Surface, stats: &mut SvgRenderStats) -> Result<String, fmt::Error> {
    let viewport = surface.viewport();
    let margin = surface.margin();
    let mut out = String::with_capacity(4096);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        escape(surface.element_id()),
        viewport.width,
        viewport.height,
        viewport.width,
        viewport.height
    )?;
    writeln!(
        out,
        r#"  <g class="chart" transform="translate({:.2},{:.2})">"#,
        margin.left, margin.top
    )?;
    for axis in surface.axes() {
        write_group(&mut out, axis, "axis", stats)?;
    }
    for entity in surface.entities() {
        write_group(&mut out, entity, "box", stats)?;
    }
    writeln!(out, "  </g>")?;
    writeln!(out, "</svg>")?;
    Ok(out)
}

fn write_group(
    out: &mut String,
    node: &GroupNode,
    class: &str,
    stats: &mut SvgRenderStats,
) -> fmt::Result {
    writeln!(
        out,
        r#"    <g class="{class}" id="{}" data-name="{}" opacity="{:.3}">"#,
        escape(node.id()),
        escape(node.name()),
        node.opacity()
    )?;
    for element in node.elements() {
        write_element(out, node, element, stats)?;
    }
    writeln!(out, "    </g>")?;
    stats.groups_drawn += 1;
    Ok(())
}

fn write_element(
    out: &mut String,
    node: &GroupNode,
    element: &Element,
    stats: &mut SvgRenderStats,
) -> fmt::Result {
    let id = format!("{}-{}", node.id(), element.key());
    let paint = paint_attributes(element)?;
    match element.shape() {
        Shape::Line { x1, y1, x2, y2 } => {
            stats.lines_drawn += 1;
            writeln!(
                out,
                r#"      <line id="{}" x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}"{paint}/>"#,
                escape(&id)
            )
        }
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => {
            stats.rects_drawn += 1;
            writeln!(
                out,
                r#"      <rect id="{}" x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}"{paint}/>"#,
                escape(&id)
            )
        }
        Shape::Circle { cx, cy, r } => {
            stats.circles_drawn += 1;
            writeln!(
                out,
                r#"      <circle id="{}" cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}"{paint}/>"#,
                escape(&id)
            )
        }
        Shape::Text { x, y, text, anchor } => {
            stats.texts_drawn += 1;
            writeln!(
                out,
                r#"      <text id="{}" x="{x:.2}" y="{y:.2}" dy=".3em" text-anchor="{}" font-size="{:.1}"{paint}>{}</text>"#,
                escape(&id),
                anchor.as_svg(),
                element.style().font_size_px,
                escape(text)
            )
        }
    }
}

fn paint_attributes(element: &Element) -> Result<String, fmt::Error> {
    let style = element.style();
    let mut attributes = String::new();
    match style.fill {
        Some(fill) => push_color(&mut attributes, "fill", fill)?,
        None => attributes.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = style.stroke {
        push_color(&mut attributes, "stroke", stroke)?;
        write!(attributes, r#" stroke-width="{:.2}""#, style.stroke_width)?;
    }
    write!(attributes, r#" opacity="{:.3}""#, element.opacity())?;
    Ok(attributes)
}

fn push_color(attributes: &mut String, name: &str, color: Color) -> fmt::Result {
    write!(attributes, r#" {name}="{}""#, color.to_hex())?;
    if color.alpha < 1.0 {
        write!(attributes, r#" {name}-opacity="{:.3}""#, color.alpha)?;
    }
    Ok(())
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn map_backend_error(context: &str, err: fmt::Error) -> ChartError {
    ChartError::InvalidData(format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }
}
