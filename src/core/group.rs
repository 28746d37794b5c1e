use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::stats::{BoxSummary, WhiskerFn};
use crate::error::ChartResult;

/// Column header of the host table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Flat table handed over by the host data adapter.
///
/// Cells are optional so that sparse rows (`null` in JSON) survive
/// deserialization; they are skipped during conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Option<f64>>>,
}

impl DataTable {
    #[must_use]
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Option<f64>>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from dense rows.
    #[must_use]
    pub fn from_dense<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        rows: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            columns: names.into_iter().map(Column::new).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        }
    }
}

/// One plotted series with statistics computed eagerly at conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    name: String,
    values: Vec<f64>,
    sorted: Vec<f64>,
    summary: BoxSummary,
    pub highlighted: bool,
}

impl Group {
    /// Builds a group from raw row-ordered values.
    ///
    /// `values` keeps the caller's order; statistics run over a sorted copy.
    pub fn new(
        name: impl Into<String>,
        values: Vec<f64>,
        whiskers: &WhiskerFn,
    ) -> ChartResult<Self> {
        let mut sorted = values.clone();
        sorted.sort_by_key(|value| OrderedFloat(*value));
        let summary = BoxSummary::compute_with(&sorted, whiskers)?;
        Ok(Self {
            name: name.into(),
            values,
            sorted,
            summary,
            highlighted: false,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observations in their original row order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Ascending copy of the observations; whisker and outlier indices
    /// point into this slice.
    #[must_use]
    pub fn sorted_values(&self) -> &[f64] {
        &self.sorted
    }

    #[must_use]
    pub fn summary(&self) -> &BoxSummary {
        &self.summary
    }

    #[must_use]
    pub fn quartiles(&self) -> [f64; 3] {
        self.summary.quartiles
    }

    #[must_use]
    pub fn whisker_range(&self) -> Option<(usize, usize)> {
        self.summary.whisker_range
    }

    #[must_use]
    pub fn whisker_values(&self) -> Option<(f64, f64)> {
        self.summary.whisker_values(&self.sorted)
    }

    #[must_use]
    pub fn outlier_indices(&self) -> &[usize] {
        &self.summary.outlier_indices
    }

    /// Outliers as `(sorted index, value)` pairs.
    pub fn outliers(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.summary
            .outlier_indices
            .iter()
            .map(|&index| (index, self.sorted[index]))
    }
}

/// Result of converting one host table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub groups: Vec<Group>,
    pub global_min: Option<f64>,
    pub global_max: Option<f64>,
}

impl Conversion {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(Group::name).collect()
    }

    /// `(global_min, global_max)` when at least one value was kept.
    #[must_use]
    pub fn value_domain(&self) -> Option<(f64, f64)> {
        self.global_min.zip(self.global_max)
    }
}

/// Turns a host table into ordered groups plus the global value range.
///
/// An absent or column-less table converts to an empty result. Missing and
/// non-finite cells are skipped, empty columns are dropped and duplicated
/// column names keep their first occurrence.
#[must_use]
pub fn convert(table: Option<&DataTable>, whiskers: &WhiskerFn) -> Conversion {
    let Some(table) = table else {
        debug!("no table supplied; conversion skipped");
        return Conversion::empty();
    };
    if table.columns.is_empty() {
        debug!(rows = table.rows.len(), "table has no columns; conversion skipped");
        return Conversion::empty();
    }

    let mut seen = IndexSet::with_capacity(table.columns.len());
    let mut conversion = Conversion::empty();

    for (column_index, column) in table.columns.iter().enumerate() {
        if !seen.insert(column.name.as_str()) {
            warn!(name = %column.name, column_index, "duplicate column name dropped");
            continue;
        }

        let mut values = Vec::with_capacity(table.rows.len());
        for (row_index, row) in table.rows.iter().enumerate() {
            match row.get(column_index).copied().flatten() {
                Some(value) if value.is_finite() => values.push(value),
                Some(value) => trace!(row_index, column_index, value, "non-finite cell skipped"),
                None => trace!(row_index, column_index, "missing cell skipped"),
            }
        }

        if values.is_empty() {
            debug!(name = %column.name, "empty group excluded");
            continue;
        }

        let group = match Group::new(column.name.clone(), values, whiskers) {
            Ok(group) => group,
            Err(err) => {
                warn!(
                    name = %column.name,
                    error = %err,
                    "group statistics failed; group excluded"
                );
                continue;
            }
        };

        let summary = group.summary();
        conversion.global_min = Some(
            conversion
                .global_min
                .map_or(summary.min, |current| current.min(summary.min)),
        );
        conversion.global_max = Some(
            conversion
                .global_max
                .map_or(summary.max, |current| current.max(summary.max)),
        );
        conversion.groups.push(group);
    }

    debug!(
        columns = table.columns.len(),
        rows = table.rows.len(),
        groups = conversion.groups.len(),
        "table converted"
    );
    conversion
}
