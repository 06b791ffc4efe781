use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::latest::TimeWindow;
use crate::uri::Platform;

use super::error::CatalogError;
use super::records::{CatalogRecord, DatasetEntry, DependencyEdge, DependentRecord};
use super::snapshot::CatalogSnapshot;
use super::Catalog;

/// File-backed catalog.
///
/// Loads a [`CatalogSnapshot`] from a JSON (`.json`) or YAML (`.yaml`,
/// `.yml`) file once and answers every query from memory. The snapshot is
/// never written back.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: Option<PathBuf>,
    snapshot: CatalogSnapshot,
}

impl FileCatalog {
    /// Loads a snapshot file, picking the format from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let snapshot: CatalogSnapshot = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => {
                return Err(CatalogError::InvalidSnapshot(format!(
                    "unsupported snapshot format: {}",
                    path.display()
                )))
            }
        };
        snapshot.validate()?;

        debug!(
            path = %path.display(),
            datasets = snapshot.datasets.len(),
            object_names = snapshot.object_names.len(),
            "loaded catalog snapshot"
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            snapshot,
        })
    }

    /// Wraps an in-memory snapshot.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, CatalogError> {
        snapshot.validate()?;
        Ok(Self {
            path: None,
            snapshot,
        })
    }

    /// File the snapshot was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The loaded snapshot.
    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    fn dataset(&self, id: i64) -> Option<&DatasetEntry> {
        self.snapshot.datasets.iter().find(|d| d.id == id)
    }

    fn dependent(&self, dataset_id: Option<i64>, sub_type: &Option<String>) -> Option<DependentRecord> {
        let dataset = self.dataset(dataset_id?)?;
        Some(DependentRecord {
            dataset_id: dataset.id,
            urn: dataset.urn.clone(),
            dataset_type: dataset.dataset_type.clone(),
            object_sub_type: sub_type.clone(),
        })
    }
}

impl Catalog for FileCatalog {
    fn lookup_catalog_records(
        &self,
        object_path: &str,
        platform: Option<Platform>,
        cluster: &str,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let object_path = object_path.to_lowercase();
        let cluster = cluster.to_lowercase();
        let object_type = platform.and_then(|p| p.scheme());

        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for row in &self.snapshot.object_names {
            let Some(dataset_id) = row.object_dataset_id else {
                continue;
            };
            if row.object_name.to_lowercase() != object_path {
                continue;
            }
            if let Some(object_type) = object_type {
                if !row.object_type.eq_ignore_ascii_case(object_type) {
                    continue;
                }
            }
            let Some(dataset) = self.dataset(dataset_id) else {
                continue;
            };

            let instance = self.snapshot.instances.iter().find(|i| {
                i.dataset_id == dataset_id
                    && i
                        .server_cluster
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase() == cluster)
            });
            let Some(instance) = instance else {
                continue;
            };

            if seen.insert(dataset_id) {
                records.push(CatalogRecord {
                    dataset_id,
                    urn: dataset.urn.clone(),
                    dataset_type: dataset.dataset_type.clone(),
                    deployment_tier: instance.deployment_tier.clone(),
                    data_center: instance.data_center.clone(),
                    server_cluster: instance.server_cluster.clone(),
                });
            }
        }

        Ok(records)
    }

    fn lookup_dependency_edges(&self, dataset_id: i64) -> Result<Vec<DependencyEdge>, CatalogError> {
        Ok(self
            .snapshot
            .object_names
            .iter()
            .filter(|row| row.object_dataset_id == Some(dataset_id) && row.is_mapping())
            .map(|row| DependencyEdge {
                mapped_dataset_id: row.mapped_object_dataset_id,
                mapped_object_name: row.mapped_object_name.clone(),
                mapped_object_type: row.mapped_object_type.clone(),
                mapped_object_sub_type: row.mapped_object_sub_type.clone(),
            })
            .collect())
    }

    fn lookup_direct_parents(&self, urn: &str) -> Result<BTreeSet<String>, CatalogError> {
        Ok(self
            .snapshot
            .family
            .iter()
            .filter(|row| row.child_urn == urn)
            .map(|row| row.parent_urn.clone())
            .collect())
    }

    fn lookup_dependents(&self, dataset_id: i64) -> Result<Vec<DependentRecord>, CatalogError> {
        if dataset_id <= 0 {
            return Ok(Vec::new());
        }

        Ok(self
            .snapshot
            .object_names
            .iter()
            .filter(|row| row.mapped_object_dataset_id == Some(dataset_id))
            .filter_map(|row| self.dependent(row.object_dataset_id, &row.object_sub_type))
            .collect())
    }

    fn lookup_dependents_by_name(
        &self,
        object_type: &str,
        path: &str,
    ) -> Result<Vec<DependentRecord>, CatalogError> {
        if object_type.is_empty() || path.is_empty() {
            return Ok(Vec::new());
        }

        let child_prefix = format!("{path}/");
        Ok(self
            .snapshot
            .object_names
            .iter()
            .filter(|row| row.mapped_object_type == object_type)
            .filter(|row| {
                row.mapped_object_name == path || row.mapped_object_name.starts_with(&child_prefix)
            })
            .filter_map(|row| self.dependent(row.object_dataset_id, &row.object_sub_type))
            .collect())
    }

    fn dataset_by_id(&self, id: i64) -> Result<Option<DatasetEntry>, CatalogError> {
        Ok(self.dataset(id).cloned())
    }

    fn dataset_by_urn(&self, urn: &str) -> Result<Option<DatasetEntry>, CatalogError> {
        Ok(self
            .snapshot
            .datasets
            .iter()
            .find(|d| d.urn == urn)
            .cloned())
    }

    fn urns_with_properties_like(&self, pattern: &str) -> Result<Vec<String>, CatalogError> {
        let matcher = like_regex(pattern)?;
        Ok(self
            .snapshot
            .datasets
            .iter()
            .filter(|d| matcher.is_match(&d.properties_text()))
            .map(|d| d.urn.clone())
            .collect())
    }

    fn latest_of_type(
        &self,
        dataset_type: &str,
        window: &TimeWindow,
    ) -> Result<Option<String>, CatalogError> {
        let prefix = format!("{}://", dataset_type.to_lowercase());

        let mut latest: Option<&DatasetEntry> = None;
        for dataset in &self.snapshot.datasets {
            if !dataset.urn.to_lowercase().starts_with(&prefix)
                || !dataset.is_valid()
                || !window.contains(dataset.source_modified_time)
            {
                continue;
            }
            // Ties keep the first dataset in snapshot order.
            if latest.map_or(true, |l| dataset.source_modified_time > l.source_modified_time) {
                latest = Some(dataset);
            }
        }

        Ok(latest.map(|d| d.urn.clone()))
    }
}

/// Compiles a SQL `LIKE` pattern into an anchored, case-insensitive regex.
///
/// `%` matches any run of characters, `_` exactly one, `\` escapes the next
/// character. Case folding follows Unicode simple case folding. Properties
/// are matched in compact JSON form, so whitespace around an unescaped `:`
/// in the pattern is optional.
fn like_regex(pattern: &str) -> Result<Regex, CatalogError> {
    let mut expr = String::from("(?is)^");
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => literal.push(chars.next().unwrap_or('\\')),
            '%' | '_' => {
                expr.push_str(&regex::escape(&literal));
                literal.clear();
                expr.push_str(if ch == '%' { ".*" } else { "." });
            }
            ':' => {
                expr.push_str(&regex::escape(literal.trim_end()));
                literal.clear();
                expr.push_str(r"\s*:\s*");
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
            }
            other => literal.push(other),
        }
    }
    expr.push_str(&regex::escape(&literal));
    expr.push('$');

    Ok(Regex::new(&expr)?)
}
