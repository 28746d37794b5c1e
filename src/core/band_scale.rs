use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_INNER_PADDING: f64 = 0.7;
pub const DEFAULT_OUTER_PADDING: f64 = 0.3;

/// Categorical name-to-band mapping for the horizontal axis.
///
/// The pixel span is divided into `n - inner + 2 * outer` steps; every name
/// gets one band of `step * (1 - inner)` pixels, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    bands: IndexMap<String, f64>,
    pixel_start: f64,
    pixel_end: f64,
    inner_padding: f64,
    outer_padding: f64,
    step: f64,
    band_width: f64,
}

impl BandScale {
    /// Builds a band scale with the default paddings (0.7 inner, 0.3 outer).
    pub fn new<S: AsRef<str>>(
        names: &[S],
        pixel_start: f64,
        pixel_end: f64,
    ) -> ChartResult<Self> {
        Self::with_padding(
            names,
            pixel_start,
            pixel_end,
            DEFAULT_INNER_PADDING,
            DEFAULT_OUTER_PADDING,
        )
    }

    pub fn with_padding<S: AsRef<str>>(
        names: &[S],
        pixel_start: f64,
        pixel_end: f64,
        inner_padding: f64,
        outer_padding: f64,
    ) -> ChartResult<Self> {
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(ChartError::InvalidData(
                "band scale pixel range must be finite".to_owned(),
            ));
        }
        if !(0.0..1.0).contains(&inner_padding) {
            return Err(ChartError::InvalidData(format!(
                "band inner padding must be within [0, 1), got {inner_padding}"
            )));
        }
        if !outer_padding.is_finite() || outer_padding < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "band outer padding must be finite and >= 0, got {outer_padding}"
            )));
        }

        let mut bands = IndexMap::with_capacity(names.len());
        let count = names.len() as f64;
        let divisor = count - inner_padding + 2.0 * outer_padding;
        let step = if names.is_empty() || divisor <= 0.0 {
            0.0
        } else {
            (pixel_end - pixel_start) / divisor
        };
        let first = pixel_start + step * outer_padding;
        for (index, name) in names.iter().enumerate() {
            bands
                .entry(name.as_ref().to_owned())
                .or_insert(first + step * index as f64);
        }

        Ok(Self {
            bands,
            pixel_start,
            pixel_end,
            inner_padding,
            outer_padding,
            step,
            band_width: step * (1.0 - inner_padding),
        })
    }

    #[must_use]
    pub fn band_width(&self) -> f64 {
        self.band_width
    }

    /// Distance between the starts of two neighbouring bands.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn band_start(&self, name: &str) -> Option<f64> {
        self.bands.get(name).copied()
    }

    #[must_use]
    pub fn band_center(&self, name: &str) -> Option<f64> {
        self.band_start(name).map(|start| start + self.band_width / 2.0)
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.pixel_start, self.pixel_end)
    }

    #[must_use]
    pub fn paddings(&self) -> (f64, f64) {
        (self.inner_padding, self.outer_padding)
    }

    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.bands.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Name of the band containing pixel `x`, if any.
    #[must_use]
    pub fn band_at(&self, x: f64) -> Option<&str> {
        self.bands
            .iter()
            .find(|(_, start)| x >= **start && x <= **start + self.band_width)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;

    #[test]
    fn single_band_is_centered() {
        let scale = BandScale::new(&["only"], 0.0, 100.0).expect("scale");
        // step = 100 / (1 - 0.7 + 0.6) = 111.1, band = 33.3
        let start = scale.band_start("only").expect("band");
        let center = start + scale.band_width() / 2.0;
        assert!((center - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_domain_has_no_bands() {
        let scale = BandScale::new::<&str>(&[], 0.0, 100.0).expect("scale");
        assert!(scale.is_empty());
        assert_eq!(scale.band_width(), 0.0);
        assert_eq!(scale.band_at(10.0), None);
    }
}
