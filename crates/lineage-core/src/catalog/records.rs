//! Typed rows returned across the catalog boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog row resolved for a dataset identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub dataset_id: i64,
    pub urn: String,
    pub dataset_type: String,
    pub deployment_tier: Option<String>,
    pub data_center: Option<String>,
    pub server_cluster: Option<String>,
}

/// One outgoing dependency edge of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Absent when the mapped object is not a registered dataset.
    pub mapped_dataset_id: Option<i64>,
    pub mapped_object_name: String,
    pub mapped_object_type: String,
    pub mapped_object_sub_type: String,
}

/// A dataset that depends on another one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentRecord {
    pub dataset_id: i64,
    pub urn: String,
    pub dataset_type: String,
    pub object_sub_type: Option<String>,
}

/// A registered dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub id: i64,
    pub urn: String,
    pub dataset_type: String,
    #[serde(default)]
    pub properties: serde_json::Value,
    #[serde(default)]
    pub source_modified_time: Option<DateTime<Utc>>,
}

impl DatasetEntry {
    /// Returns true when the properties mark the dataset as valid.
    ///
    /// Only the string value `"true"` counts.
    pub fn is_valid(&self) -> bool {
        self.properties
            .get("valid")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|v| v == "true")
    }

    /// Properties rendered as compact JSON, the form pattern searches run on.
    pub fn properties_text(&self) -> String {
        if self.properties.is_null() {
            return String::new();
        }
        self.properties.to_string()
    }
}
