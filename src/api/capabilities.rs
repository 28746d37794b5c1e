use serde::Serialize;

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataRoleKind {
    Grouping,
    Measure,
    GroupingOrMeasure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataRole {
    pub name: &'static str,
    pub kind: DataRoleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyType {
    FormatString,
    SolidColorFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectProperty {
    pub name: &'static str,
    pub display_name: &'static str,
    pub property_type: PropertyType,
}

/// Formatting pane object exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityObject {
    pub name: &'static str,
    pub display_name: &'static str,
    pub properties: &'static [ObjectProperty],
}

/// Table mapping requested from the host: rows bound to `role`, windowed
/// reduction, at least `min_rows` preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableMapping {
    pub role: &'static str,
    pub windowed_reduction: bool,
    pub min_rows: u32,
}

/// Static description of what the visual consumes and exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisualCapabilities {
    pub data_roles: &'static [DataRole],
    pub table_mapping: TableMapping,
    pub objects: &'static [CapabilityObject],
}

impl VisualCapabilities {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize capabilities json: {e}"))
        })
    }

    #[must_use]
    pub fn object(&self, name: &str) -> Option<&CapabilityObject> {
        self.objects.iter().find(|object| object.name == name)
    }
}

const VALUES_ROLE: &str = "Values";

static CAPABILITIES: VisualCapabilities = VisualCapabilities {
    data_roles: &[DataRole {
        name: VALUES_ROLE,
        kind: DataRoleKind::GroupingOrMeasure,
    }],
    table_mapping: TableMapping {
        role: VALUES_ROLE,
        windowed_reduction: true,
        min_rows: 1,
    },
    objects: &[
        CapabilityObject {
            name: "general",
            display_name: "General",
            properties: &[ObjectProperty {
                name: "formatString",
                display_name: "Format",
                property_type: PropertyType::FormatString,
            }],
        },
        CapabilityObject {
            name: "label",
            display_name: "Label",
            properties: &[ObjectProperty {
                name: "fill",
                display_name: "Fill",
                property_type: PropertyType::SolidColorFill,
            }],
        },
    ],
};

#[must_use]
pub fn capabilities() -> &'static VisualCapabilities {
    &CAPABILITIES
}
