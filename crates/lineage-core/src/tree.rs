//! Dependency tree expansion.
//!
//! A dataset's dependency edges are expanded depth first. Every record gets
//! a topology sort id built from its path of 1-based sibling indexes, each
//! multiplied by [`SORT_ID_STEP`]:
//!
//! ```text
//! R ─┬─ A (100) ── C (100100)
//!    └─ B (200)
//! ```
//!
//! Numbering is pre-order but records are appended post-order, so the
//! sequence for the tree above is `[C, A, B]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError, DependencyEdge};
use crate::config::{TraversalConfig, SORT_ID_STEP};
use crate::uri::split_path;

/// One node of a dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub dataset_id: Option<i64>,
    pub database_name: String,
    pub table_name: String,
    pub level_from_root: u32,
    #[serde(rename = "type")]
    pub dependency_type: String,
    pub ref_obj_location: String,
    pub ref_obj_type: String,
    pub topology_sort_id: String,
    pub next_level_dependency_count: usize,
}

impl DependencyRecord {
    /// Leaf records have no further recorded dependencies.
    pub fn is_leaf(&self) -> bool {
        self.next_level_dependency_count == 0
    }
}

/// Errors that abort a tree expansion.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cyclic dependency on dataset {dataset_id} via {chain:?}")]
    CyclicDependency { dataset_id: i64, chain: Vec<i64> },

    #[error("Dependency tree deeper than {limit} levels")]
    DepthExceeded { limit: u32 },

    #[error("Dependency tree larger than {limit} records")]
    NodeLimitExceeded { limit: usize },
}

/// Ordered result of a full expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTree {
    records: Vec<DependencyRecord>,
}

impl DependencyTree {
    /// Records in append (post-) order.
    pub fn records(&self) -> &[DependencyRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DependencyRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records without further dependencies. The root is never counted.
    pub fn leaf_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_leaf()).count()
    }
}

/// Expands dependency edges fetched from a [`Catalog`].
pub struct DependencyTreeBuilder<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    limits: TraversalConfig,
    /// Dataset ids currently being expanded, root first.
    chain: Vec<i64>,
    created: usize,
}

impl<'a, C: Catalog + ?Sized> DependencyTreeBuilder<'a, C> {
    pub fn new(catalog: &'a C, limits: TraversalConfig) -> Self {
        Self {
            catalog,
            limits,
            chain: Vec::new(),
            created: 0,
        }
    }

    /// Expands the full tree below `root_id`.
    pub fn build(&mut self, root_id: i64) -> Result<DependencyTree, TreeError> {
        self.chain.clear();

        let mut records = Vec::new();
        self.expand(root_id, "", 1, &mut records)?;

        debug!(root_id, records = records.len(), "expanded dependency tree");
        Ok(DependencyTree { records })
    }

    /// Expands the direct dependencies of `dataset_id` into `accumulator`.
    ///
    /// New records sit at `level` and their sort ids extend `sort_prefix`.
    /// Returns the number of direct dependencies found.
    ///
    /// Each top-level call gets the full `max_nodes` budget.
    pub fn expand(
        &mut self,
        dataset_id: i64,
        sort_prefix: &str,
        level: u32,
        accumulator: &mut Vec<DependencyRecord>,
    ) -> Result<usize, TreeError> {
        // The chain is empty only outside of a running expansion.
        if self.chain.is_empty() {
            self.created = 0;
        }
        if self.chain.contains(&dataset_id) {
            let mut chain = self.chain.clone();
            chain.push(dataset_id);
            return Err(TreeError::CyclicDependency { dataset_id, chain });
        }

        let edges = self.catalog.lookup_dependency_edges(dataset_id)?;
        if edges.is_empty() {
            return Ok(0);
        }
        if level > self.limits.max_depth {
            return Err(TreeError::DepthExceeded {
                limit: self.limits.max_depth,
            });
        }

        self.chain.push(dataset_id);
        let expanded = self.expand_edges(&edges, sort_prefix, level, accumulator);
        self.chain.pop();
        expanded?;

        Ok(edges.len())
    }

    fn expand_edges(
        &mut self,
        edges: &[DependencyEdge],
        sort_prefix: &str,
        level: u32,
        accumulator: &mut Vec<DependencyRecord>,
    ) -> Result<(), TreeError> {
        for (index, edge) in edges.iter().enumerate() {
            self.created += 1;
            if self.created > self.limits.max_nodes {
                return Err(TreeError::NodeLimitExceeded {
                    limit: self.limits.max_nodes,
                });
            }

            let (database_name, table_name) = location_names(&edge.mapped_object_name);
            let mut record = DependencyRecord {
                dataset_id: edge.mapped_dataset_id,
                database_name,
                table_name,
                level_from_root: level,
                dependency_type: edge.mapped_object_sub_type.clone(),
                ref_obj_location: edge.mapped_object_name.clone(),
                ref_obj_type: edge.mapped_object_type.clone(),
                topology_sort_id: format!("{sort_prefix}{}", (index + 1) * SORT_ID_STEP),
                next_level_dependency_count: 0,
            };

            // Edges onto unregistered objects are leaves.
            if let Some(child_id) = edge.mapped_dataset_id {
                record.next_level_dependency_count =
                    self.expand(child_id, &record.topology_sort_id, level + 1, accumulator)?;
            }

            accumulator.push(record);
        }
        Ok(())
    }
}

/// Database and table names from a `/database/table` location.
///
/// Both are empty unless the location splits into exactly three segments.
fn location_names(location: &str) -> (String, String) {
    if location.trim().is_empty() {
        return (String::new(), String::new());
    }
    match split_path(location).as_slice() {
        &[_, database, table] => (database.to_string(), table.to_string()),
        _ => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_names() {
        assert_eq!(
            location_names("/tracking/page_view"),
            ("tracking".to_string(), "page_view".to_string())
        );
        assert_eq!(location_names("/data/tracking/page_view"), (String::new(), String::new()));
        assert_eq!(location_names("tracking"), (String::new(), String::new()));
        assert_eq!(location_names(""), (String::new(), String::new()));
    }
}
