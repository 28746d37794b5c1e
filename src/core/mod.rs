pub mod band_scale;
pub mod group;
pub mod scale;
pub mod stats;
pub mod types;

pub use band_scale::{BandScale, DEFAULT_INNER_PADDING, DEFAULT_OUTER_PADDING};
pub use group::{Column, Conversion, DataTable, Group, convert};
pub use scale::LinearScale;
pub use stats::{
    BoxSummary, DEFAULT_WHISKER_FACTOR, WhiskerFn, outliers, percentile, quartiles,
    tukey_whiskers, whisker_range,
};
pub use types::{Margin, Viewport};
