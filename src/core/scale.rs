use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Continuous value-to-pixel mapping.
///
/// `domain_min` maps to `pixel_low` and `domain_max` to `pixel_high`. For the
/// value axis `pixel_low` is the larger pixel, since screen Y grows downward
/// while values grow upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    pixel_low: f64,
    pixel_high: f64,
}

impl LinearScale {
    pub fn new(
        domain_min: f64,
        domain_max: f64,
        pixel_low: f64,
        pixel_high: f64,
    ) -> ChartResult<Self> {
        if !domain_min.is_finite() || !domain_max.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if domain_min > domain_max {
            return Err(ChartError::InvalidData(format!(
                "scale domain is reversed: {domain_min} > {domain_max}"
            )));
        }
        if !pixel_low.is_finite() || !pixel_high.is_finite() {
            return Err(ChartError::InvalidData(
                "scale pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_min,
            domain_max,
            pixel_low,
            pixel_high,
        })
    }

    /// Scale with domain `[0, +inf)`: every finite value lands on
    /// `pixel_low`. Used as the starting geometry of entering elements.
    #[must_use]
    pub fn unbounded(pixel_low: f64, pixel_high: f64) -> Self {
        Self {
            domain_min: 0.0,
            domain_max: f64::INFINITY,
            pixel_low,
            pixel_high,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.pixel_low, self.pixel_high)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.domain_min == self.domain_max
    }

    /// Whether this is the `[0, +inf)` scale from [`LinearScale::unbounded`].
    #[must_use]
    pub fn is_unbounded(self) -> bool {
        self.domain_max == f64::INFINITY
    }

    /// Position of `value` within the domain, 0 at `domain_min` and 1 at
    /// `domain_max`. Finite domains wider than `f64::MAX` are normalized on
    /// halved bounds so the span never overflows.
    fn normalize(self, value: f64) -> Option<f64> {
        if self.is_unbounded() || self.is_degenerate() {
            return None;
        }
        let span = self.domain_max - self.domain_min;
        if span.is_finite() {
            Some((value - self.domain_min) / span)
        } else {
            let half_span = self.domain_max / 2.0 - self.domain_min / 2.0;
            Some((value / 2.0 - self.domain_min / 2.0) / half_span)
        }
    }

    /// Domain span divided by `count`, computed without overflowing.
    fn span_fraction(self, count: f64) -> f64 {
        let span = self.domain_max - self.domain_min;
        if span.is_finite() {
            span / count
        } else {
            (self.domain_max / 2.0 - self.domain_min / 2.0) / count * 2.0
        }
    }

    /// Maps a value to pixel space. Degenerate and unbounded domains map
    /// everything to `pixel_low`.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        match self.normalize(value) {
            Some(normalized) => self.pixel_low + normalized * (self.pixel_high - self.pixel_low),
            None => self.pixel_low,
        }
    }

    /// Maps a pixel back to the domain; `None` when the scale is constant.
    #[must_use]
    pub fn invert(self, pixel: f64) -> Option<f64> {
        let pixel_span = self.pixel_high - self.pixel_low;
        if pixel_span == 0.0 || self.is_unbounded() || self.is_degenerate() {
            return None;
        }
        let normalized = (pixel - self.pixel_low) / pixel_span;
        let span = self.domain_max - self.domain_min;
        if span.is_finite() {
            Some(self.domain_min + normalized * span)
        } else {
            Some(self.domain_min * (1.0 - normalized) + self.domain_max * normalized)
        }
    }

    /// Step between "nice" ticks (1, 2 or 5 times a power of ten) for roughly
    /// `count` ticks over the domain. `None` when no positive finite step
    /// exists, e.g. for a domain only a few subnormals wide.
    #[must_use]
    pub fn tick_step(self, count: usize) -> Option<f64> {
        if count == 0 || self.is_unbounded() || self.domain_min >= self.domain_max {
            return None;
        }

        let raw = self.span_fraction(count as f64);
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }
        let power = 10f64.powf(raw.log10().floor());
        if !power.is_finite() || power <= 0.0 {
            return None;
        }
        let error = raw / power;
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };
        let step = factor * power;
        (step.is_finite() && step > 0.0).then_some(step)
    }

    /// Nice tick values inside the domain, ascending. Empty when the domain
    /// admits no usable step or would need more than `4 * count` ticks.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        if self.is_degenerate() && self.domain_min.is_finite() {
            return vec![self.domain_min];
        }
        let Some(step) = self.tick_step(count) else {
            return Vec::new();
        };

        let first = (self.domain_min / step).ceil();
        let last = (self.domain_max / step).floor();
        let limit = count.saturating_mul(MAX_TICKS_PER_REQUESTED) as f64;
        if !first.is_finite() || !last.is_finite() || last < first || last - first >= limit {
            return Vec::new();
        }
        let (first, last) = (first as i64, last as i64);
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

const MAX_TICKS_PER_REQUESTED: usize = 4;
