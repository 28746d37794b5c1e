use crate::error::{ChartError, ChartResult};

use super::{InitOptions, UpdateOptions};

impl InitOptions {
    pub fn from_json(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse init options json: {e}")))
    }
}

impl UpdateOptions {
    /// Parses the host update payload:
    /// `{"viewport": {...}, "data": {"columns": [...], "rows": [[...]]}}`.
    /// `data` may be absent or `null`.
    pub fn from_json(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse update options json: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize update options json: {e}"))
        })
    }
}
