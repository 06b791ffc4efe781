#![allow(dead_code)]

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use lineage_core::catalog::{FamilyRow, InstanceRow, ObjectNameRow};
use lineage_core::{
    Catalog, CatalogError, CatalogRecord, CatalogSnapshot, DatasetEntry, DependencyEdge,
    DependentRecord, FileCatalog, Platform, TimeWindow,
};
use serde_json::json;

pub const CLUSTER: &str = "ltx1-holdem";

pub fn time(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn dataset(id: i64, urn: &str, dataset_type: &str) -> DatasetEntry {
    DatasetEntry {
        id,
        urn: urn.to_string(),
        dataset_type: dataset_type.to_string(),
        properties: json!({}),
        source_modified_time: None,
    }
}

pub fn instance(dataset_id: i64, cluster: &str) -> InstanceRow {
    InstanceRow {
        dataset_id,
        deployment_tier: Some("prod".to_string()),
        data_center: Some("ltx1".to_string()),
        server_cluster: Some(cluster.to_string()),
    }
}

/// Name-map row registering `name` for a dataset without mapping it anywhere.
pub fn registration(dataset_id: i64, object_type: &str, name: &str) -> ObjectNameRow {
    ObjectNameRow {
        object_dataset_id: Some(dataset_id),
        object_type: object_type.to_string(),
        object_sub_type: None,
        object_name: name.to_string(),
        mapped_object_dataset_id: None,
        mapped_object_type: String::new(),
        mapped_object_sub_type: String::new(),
        mapped_object_name: String::new(),
    }
}

/// Dependency edge from `(dataset_id, name)` onto `mapped_name`.
pub fn edge(
    dataset_id: i64,
    object_type: &str,
    name: &str,
    mapped_id: Option<i64>,
    mapped_type: &str,
    mapped_name: &str,
) -> ObjectNameRow {
    ObjectNameRow {
        object_dataset_id: Some(dataset_id),
        object_type: object_type.to_string(),
        object_sub_type: Some("view".to_string()),
        object_name: name.to_string(),
        mapped_object_dataset_id: mapped_id,
        mapped_object_type: mapped_type.to_string(),
        mapped_object_sub_type: "table".to_string(),
        mapped_object_name: mapped_name.to_string(),
    }
}

pub fn family(parent: &str, child: &str) -> FamilyRow {
    FamilyRow {
        parent_urn: parent.to_string(),
        child_urn: child.to_string(),
    }
}

/// Catalog with the tree
///
/// ```text
/// page_view (1) ─┬─ sessions (2) ── clicks (4)
///                └─ events (3)
/// ```
///
/// plus a registered leaf `/raw/orphan` (5) and a few family rows.
pub fn lineage_snapshot() -> CatalogSnapshot {
    let mut page_view = dataset(1, "hive:///tracking/page_view", "hive");
    page_view.properties = json!({"valid": "true", "owner": "data_eng"});
    page_view.source_modified_time = Some(time(1_000));

    let mut sessions = dataset(2, "hive:///tracking/sessions", "hive");
    sessions.properties = json!({"valid": "true", "owner": "ml"});
    sessions.source_modified_time = Some(time(2_000));

    let mut events = dataset(3, "hdfs:///raw/events", "hdfs");
    events.properties = json!({"valid": "true", "owner": "data_eng"});
    events.source_modified_time = Some(time(3_000));

    let mut clicks = dataset(4, "hdfs:///raw/clicks", "hdfs");
    clicks.properties = json!({"valid": "false"});
    clicks.source_modified_time = Some(time(4_000));

    let orphan = dataset(5, "dalids:///raw/orphan", "dalids");

    CatalogSnapshot {
        datasets: vec![page_view, sessions, events, clicks, orphan],
        instances: vec![
            instance(1, CLUSTER),
            instance(2, CLUSTER),
            instance(3, CLUSTER),
            instance(4, CLUSTER),
            instance(5, CLUSTER),
        ],
        object_names: vec![
            edge(1, "hive", "/tracking/page_view", Some(2), "hive", "/tracking/sessions"),
            edge(1, "hive", "/tracking/page_view", Some(3), "hdfs", "/raw/events"),
            edge(2, "hive", "/tracking/sessions", Some(4), "hdfs", "/raw/clicks"),
            registration(3, "hdfs", "/raw/events"),
            registration(4, "hdfs", "/raw/clicks"),
            registration(5, "dalids", "/raw/orphan"),
        ],
        family: vec![
            family("hdfs:///raw", "hive:///tracking/page_view"),
            family("hdfs:///shared", "hive:///tracking/page_view"),
            family("hdfs:///shared", "hive:///tracking/sessions"),
            family("hdfs:///ml", "hive:///tracking/sessions"),
        ],
    }
}

pub fn lineage_catalog() -> FileCatalog {
    FileCatalog::from_snapshot(lineage_snapshot()).unwrap()
}

/// Catalog whose every query fails, for error propagation tests.
pub struct UnavailableCatalog;

impl UnavailableCatalog {
    fn fail<T>() -> Result<T, CatalogError> {
        Err(CatalogError::Unavailable("catalog offline".to_string()))
    }
}

impl Catalog for UnavailableCatalog {
    fn lookup_catalog_records(
        &self,
        _object_path: &str,
        _platform: Option<Platform>,
        _cluster: &str,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        Self::fail()
    }

    fn lookup_dependency_edges(&self, _dataset_id: i64) -> Result<Vec<DependencyEdge>, CatalogError> {
        Self::fail()
    }

    fn lookup_direct_parents(&self, _urn: &str) -> Result<BTreeSet<String>, CatalogError> {
        Self::fail()
    }

    fn lookup_dependents(&self, _dataset_id: i64) -> Result<Vec<DependentRecord>, CatalogError> {
        Self::fail()
    }

    fn lookup_dependents_by_name(
        &self,
        _object_type: &str,
        _path: &str,
    ) -> Result<Vec<DependentRecord>, CatalogError> {
        Self::fail()
    }

    fn dataset_by_id(&self, _id: i64) -> Result<Option<DatasetEntry>, CatalogError> {
        Self::fail()
    }

    fn dataset_by_urn(&self, _urn: &str) -> Result<Option<DatasetEntry>, CatalogError> {
        Self::fail()
    }

    fn urns_with_properties_like(&self, _pattern: &str) -> Result<Vec<String>, CatalogError> {
        Self::fail()
    }

    fn latest_of_type(
        &self,
        _dataset_type: &str,
        _window: &TimeWindow,
    ) -> Result<Option<String>, CatalogError> {
        Self::fail()
    }
}

/// Catalog that resolves lookups normally but fails once edges are expanded
/// below the root.
pub struct FailingEdgesCatalog {
    pub inner: FileCatalog,
    pub fail_on: i64,
}

impl Catalog for FailingEdgesCatalog {
    fn lookup_catalog_records(
        &self,
        object_path: &str,
        platform: Option<Platform>,
        cluster: &str,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.inner.lookup_catalog_records(object_path, platform, cluster)
    }

    fn lookup_dependency_edges(&self, dataset_id: i64) -> Result<Vec<DependencyEdge>, CatalogError> {
        if dataset_id == self.fail_on {
            return Err(CatalogError::Unavailable(format!("edges of {dataset_id}")));
        }
        self.inner.lookup_dependency_edges(dataset_id)
    }

    fn lookup_direct_parents(&self, urn: &str) -> Result<BTreeSet<String>, CatalogError> {
        self.inner.lookup_direct_parents(urn)
    }

    fn lookup_dependents(&self, dataset_id: i64) -> Result<Vec<DependentRecord>, CatalogError> {
        self.inner.lookup_dependents(dataset_id)
    }

    fn lookup_dependents_by_name(
        &self,
        object_type: &str,
        path: &str,
    ) -> Result<Vec<DependentRecord>, CatalogError> {
        self.inner.lookup_dependents_by_name(object_type, path)
    }

    fn dataset_by_id(&self, id: i64) -> Result<Option<DatasetEntry>, CatalogError> {
        self.inner.dataset_by_id(id)
    }

    fn dataset_by_urn(&self, urn: &str) -> Result<Option<DatasetEntry>, CatalogError> {
        self.inner.dataset_by_urn(urn)
    }

    fn urns_with_properties_like(&self, pattern: &str) -> Result<Vec<String>, CatalogError> {
        self.inner.urns_with_properties_like(pattern)
    }

    fn latest_of_type(
        &self,
        dataset_type: &str,
        window: &TimeWindow,
    ) -> Result<Option<String>, CatalogError> {
        self.inner.latest_of_type(dataset_type, window)
    }
}
