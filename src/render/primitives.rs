use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_owned(),
            _ => {
                return Err(ChartError::InvalidData(format!(
                    "color `{input}` must have 3, 6 or 8 hex digits"
                )));
            }
        };

        let channel = |offset: usize| -> ChartResult<f64> {
            let byte = expanded
                .get(offset..offset + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ChartError::InvalidData(format!("color `{input}` is not hex")))?;
            Ok(f64::from(byte) / 255.0)
        };

        let alpha = if expanded.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// `#rrggbb` form; alpha is emitted separately as an opacity attribute.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Text anchoring relative to the label's `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    #[must_use]
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Paint attributes of a drawn element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub stroke_width: f64,
    pub font_size_px: f64,
}

impl Style {
    #[must_use]
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            stroke_width: width,
            font_size_px: 0.0,
        }
    }

    #[must_use]
    pub fn filled(fill: Color, stroke: Color, width: f64) -> Self {
        Self {
            stroke: Some(stroke),
            fill: Some(fill),
            stroke_width: width,
            font_size_px: 0.0,
        }
    }

    #[must_use]
    pub fn text(color: Color, font_size_px: f64) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            stroke_width: 0.0,
            font_size_px,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and >= 0".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px < 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Geometry of one drawn element in plot-area pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
    },
}

impl Shape {
    #[must_use]
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Line { x1, y1, x2, y2 }
    }

    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::Circle { cx, cy, r }
    }

    #[must_use]
    pub fn text(x: f64, y: f64, text: impl Into<String>, anchor: TextAnchor) -> Self {
        Self::Text {
            x,
            y,
            text: text.into(),
            anchor,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
        }
    }

    /// Whether point `(px, py)` falls inside the shape's filled area.
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => px >= *x && px <= x + width && py >= *y && py <= y + height,
            Self::Circle { cx, cy, r } => (px - cx).hypot(py - cy) <= *r,
            Self::Line { .. } | Self::Text { .. } => false,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        let finite = match self {
            Self::Line { x1, y1, x2, y2 } => [*x1, *y1, *x2, *y2].iter().all(|v| v.is_finite()),
            Self::Rect {
                x,
                y,
                width,
                height,
            } => {
                if *width < 0.0 || *height < 0.0 {
                    return Err(ChartError::InvalidData(
                        "rect size must be >= 0".to_owned(),
                    ));
                }
                [*x, *y, *width, *height].iter().all(|v| v.is_finite())
            }
            Self::Circle { cx, cy, r } => {
                if *r < 0.0 {
                    return Err(ChartError::InvalidData(
                        "circle radius must be >= 0".to_owned(),
                    ));
                }
                [*cx, *cy, *r].iter().all(|v| v.is_finite())
            }
            Self::Text { x, y, .. } => x.is_finite() && y.is_finite(),
        };

        if !finite {
            return Err(ChartError::InvalidData(format!(
                "{} coordinates must be finite",
                self.kind()
            )));
        }
        Ok(())
    }
}
