use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_INNER_PADDING, DEFAULT_OUTER_PADDING, DEFAULT_WHISKER_FACTOR};
use crate::error::{ChartError, ChartResult};
use crate::interaction::HighlightPolicy;
use crate::render::{Color, Easing, TransitionSpec};

/// Host-supplied label formatter.
#[derive(Clone)]
pub struct LabelFormatter(Arc<dyn Fn(f64) -> String + Send + Sync + 'static>);

impl LabelFormatter {
    pub fn new(formatter: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(formatter))
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

impl PartialEq for LabelFormatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Number formatting for quartile, whisker and axis labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickFormat {
    Fixed {
        precision: u8,
    },
    /// Precision follows the axis tick step: a step of 0.05 prints two
    /// decimals, a step of 10 prints none.
    Auto,
    #[serde(skip)]
    Custom(LabelFormatter),
}

impl Default for TickFormat {
    fn default() -> Self {
        Self::Fixed { precision: 2 }
    }
}

impl TickFormat {
    #[must_use]
    pub fn format(&self, value: f64, tick_step: Option<f64>) -> String {
        match self {
            Self::Fixed { precision } => format!("{value:.prec$}", prec = usize::from(*precision)),
            Self::Auto => {
                let precision = tick_step.map_or(0, precision_for_step);
                format!("{value:.precision$}")
            }
            Self::Custom(formatter) => formatter.format(value),
        }
    }
}

fn precision_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let digits = -step.log10().floor();
    if digits <= 0.0 {
        0
    } else {
        (digits as usize).min(MAX_LABEL_PRECISION)
    }
}

const MAX_LABEL_PRECISION: usize = 12;

/// Chart presentation options.
///
/// Immutable once built; hosts go through [`BoxPlotConfigBuilder`] or
/// [`BoxPlotConfig::from_json`] so every instance is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxPlotConfig {
    fill_color: Color,
    stroke_color: Color,
    show_labels: bool,
    whisker_factor: f64,
    tick_format: TickFormat,
    transition_duration_ms: u64,
    easing: Easing,
    dimmed_opacity: f64,
    inner_padding: f64,
    outer_padding: f64,
    label_font_size_px: f64,
    outlier_radius_px: f64,
    highlight_policy: HighlightPolicy,
}

impl Default for BoxPlotConfig {
    fn default() -> Self {
        Self {
            fill_color: Color::WHITE,
            stroke_color: Color::BLACK,
            show_labels: true,
            whisker_factor: DEFAULT_WHISKER_FACTOR,
            tick_format: TickFormat::default(),
            transition_duration_ms: 0,
            easing: Easing::default(),
            dimmed_opacity: 0.3,
            inner_padding: DEFAULT_INNER_PADDING,
            outer_padding: DEFAULT_OUTER_PADDING,
            label_font_size_px: 10.0,
            outlier_radius_px: 5.0,
            highlight_policy: HighlightPolicy::default(),
        }
    }
}

impl BoxPlotConfig {
    #[must_use]
    pub fn builder() -> BoxPlotConfigBuilder {
        BoxPlotConfigBuilder::default()
    }

    #[must_use]
    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    #[must_use]
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    #[must_use]
    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    #[must_use]
    pub fn whisker_factor(&self) -> f64 {
        self.whisker_factor
    }

    #[must_use]
    pub fn tick_format(&self) -> &TickFormat {
        &self.tick_format
    }

    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    #[must_use]
    pub fn transition(&self) -> TransitionSpec {
        TransitionSpec::new(self.transition_duration(), self.easing)
    }

    #[must_use]
    pub fn dimmed_opacity(&self) -> f64 {
        self.dimmed_opacity
    }

    #[must_use]
    pub fn inner_padding(&self) -> f64 {
        self.inner_padding
    }

    #[must_use]
    pub fn outer_padding(&self) -> f64 {
        self.outer_padding
    }

    #[must_use]
    pub fn label_font_size_px(&self) -> f64 {
        self.label_font_size_px
    }

    #[must_use]
    pub fn outlier_radius_px(&self) -> f64 {
        self.outlier_radius_px
    }

    #[must_use]
    pub fn highlight_policy(&self) -> HighlightPolicy {
        self.highlight_policy
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.fill_color.validate()?;
        self.stroke_color.validate()?;
        if !self.whisker_factor.is_finite() || self.whisker_factor < 0.0 {
            return Err(ChartError::InvalidData(
                "whisker factor must be finite and >= 0".to_owned(),
            ));
        }
        if let TickFormat::Fixed { precision } = self.tick_format {
            if usize::from(precision) > MAX_LABEL_PRECISION {
                return Err(ChartError::InvalidData(
                    "label precision must be <= 12".to_owned(),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.dimmed_opacity) {
            return Err(ChartError::InvalidData(
                "dimmed opacity must be within [0, 1]".to_owned(),
            ));
        }
        if !(0.0..1.0).contains(&self.inner_padding) {
            return Err(ChartError::InvalidData(
                "inner padding must be within [0, 1)".to_owned(),
            ));
        }
        if !self.outer_padding.is_finite() || self.outer_padding < 0.0 {
            return Err(ChartError::InvalidData(
                "outer padding must be finite and >= 0".to_owned(),
            ));
        }
        if !self.label_font_size_px.is_finite() || self.label_font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "label font size must be finite and > 0".to_owned(),
            ));
        }
        if !self.outlier_radius_px.is_finite() || self.outlier_radius_px < 0.0 {
            return Err(ChartError::InvalidData(
                "outlier radius must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Fails for a `Custom` tick format, which has no JSON form.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config json: {e}")))
    }
}

/// Fluent builder for [`BoxPlotConfig`].
#[derive(Debug, Clone, Default)]
pub struct BoxPlotConfigBuilder {
    config: BoxPlotConfig,
}

impl BoxPlotConfigBuilder {
    #[must_use]
    pub fn fill_color(mut self, color: Color) -> Self {
        self.config.fill_color = color;
        self
    }

    #[must_use]
    pub fn stroke_color(mut self, color: Color) -> Self {
        self.config.stroke_color = color;
        self
    }

    #[must_use]
    pub fn show_labels(mut self, show: bool) -> Self {
        self.config.show_labels = show;
        self
    }

    /// Multiplier `k` of the interquartile range used for whisker fences.
    #[must_use]
    pub fn whisker_factor(mut self, k: f64) -> Self {
        self.config.whisker_factor = k;
        self
    }

    #[must_use]
    pub fn tick_format(mut self, format: TickFormat) -> Self {
        self.config.tick_format = format;
        self
    }

    #[must_use]
    pub fn label_formatter(
        self,
        formatter: impl Fn(f64) -> String + Send + Sync + 'static,
    ) -> Self {
        self.tick_format(TickFormat::Custom(LabelFormatter::new(formatter)))
    }

    #[must_use]
    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.config.transition_duration_ms =
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.config.easing = easing;
        self
    }

    #[must_use]
    pub fn dimmed_opacity(mut self, opacity: f64) -> Self {
        self.config.dimmed_opacity = opacity;
        self
    }

    #[must_use]
    pub fn band_padding(mut self, inner: f64, outer: f64) -> Self {
        self.config.inner_padding = inner;
        self.config.outer_padding = outer;
        self
    }

    #[must_use]
    pub fn label_font_size_px(mut self, size: f64) -> Self {
        self.config.label_font_size_px = size;
        self
    }

    #[must_use]
    pub fn outlier_radius_px(mut self, radius: f64) -> Self {
        self.config.outlier_radius_px = radius;
        self
    }

    #[must_use]
    pub fn highlight_policy(mut self, policy: HighlightPolicy) -> Self {
        self.config.highlight_policy = policy;
        self
    }

    pub fn build(self) -> ChartResult<BoxPlotConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
