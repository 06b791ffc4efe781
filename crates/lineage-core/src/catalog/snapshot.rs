//! On-disk catalog snapshot format.
//!
//! A snapshot is a point-in-time copy of the catalog tables:
//!
//! ```yaml
//! datasets:
//!   - { id: 1, urn: "hive:///tracking/page_view", dataset_type: hive }
//! instances:
//!   - { dataset_id: 1, deployment_tier: prod, data_center: ltx1, server_cluster: ltx1-holdem }
//! object_names:
//!   - object_dataset_id: 1
//!     object_type: hive
//!     object_name: /tracking/page_view
//!     mapped_object_dataset_id: 2
//!     mapped_object_type: hdfs
//!     mapped_object_sub_type: table
//!     mapped_object_name: /data/page_view
//! family:
//!   - { parent_urn: "hdfs:///data/raw", child_urn: "hive:///tracking/page_view" }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::records::DatasetEntry;

/// Deployment of a dataset on a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRow {
    pub dataset_id: i64,
    #[serde(default)]
    pub deployment_tier: Option<String>,
    #[serde(default)]
    pub data_center: Option<String>,
    #[serde(default)]
    pub server_cluster: Option<String>,
}

/// Name-map row linking an object name to a dataset and to the object it maps onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectNameRow {
    #[serde(default)]
    pub object_dataset_id: Option<i64>,
    pub object_type: String,
    #[serde(default)]
    pub object_sub_type: Option<String>,
    pub object_name: String,
    #[serde(default)]
    pub mapped_object_dataset_id: Option<i64>,
    #[serde(default)]
    pub mapped_object_type: String,
    #[serde(default)]
    pub mapped_object_sub_type: String,
    #[serde(default)]
    pub mapped_object_name: String,
}

impl ObjectNameRow {
    /// Rows without a mapped object only register a name for a dataset.
    pub fn is_mapping(&self) -> bool {
        self.mapped_object_dataset_id.is_some() || !self.mapped_object_name.is_empty()
    }
}

/// Parent/child edge between two urns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRow {
    pub parent_urn: String,
    pub child_urn: String,
}

/// Complete catalog contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub datasets: Vec<DatasetEntry>,
    pub instances: Vec<InstanceRow>,
    pub object_names: Vec<ObjectNameRow>,
    pub family: Vec<FamilyRow>,
}

impl CatalogSnapshot {
    /// Checks that dataset ids and urns are unique.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        let mut urns = HashSet::new();
        for dataset in &self.datasets {
            if !ids.insert(dataset.id) {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "duplicate dataset id {}",
                    dataset.id
                )));
            }
            if !urns.insert(dataset.urn.as_str()) {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "duplicate dataset urn {}",
                    dataset.urn
                )));
            }
        }
        Ok(())
    }
}
