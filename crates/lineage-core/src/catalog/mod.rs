//! Dataset catalog access.
//!
//! The lineage resolvers never touch storage directly; everything they need
//! comes through the [`Catalog`] trait as typed rows.

mod error;
mod file;
mod records;
mod snapshot;

pub use error::CatalogError;
pub use file::FileCatalog;
pub use records::{CatalogRecord, DatasetEntry, DependencyEdge, DependentRecord};
pub use snapshot::{CatalogSnapshot, FamilyRow, InstanceRow, ObjectNameRow};

use std::collections::BTreeSet;

use crate::latest::TimeWindow;
use crate::uri::Platform;

/// Trait for dataset catalog backends.
///
/// Implementations answer point queries against a consistent view of the
/// catalog. Row order is significant wherever a `Vec` is returned.
pub trait Catalog {
    /// Finds catalog rows for an object path (`/database/table`) on a cluster.
    ///
    /// Path and cluster compare case-insensitively. `platform` restricts the
    /// match to name-map rows of that object type and is ignored for
    /// [`Platform::Generic`].
    fn lookup_catalog_records(
        &self,
        object_path: &str,
        platform: Option<Platform>,
        cluster: &str,
    ) -> Result<Vec<CatalogRecord>, CatalogError>;

    /// First row of [`Catalog::lookup_catalog_records`], if any.
    fn lookup_catalog_record(
        &self,
        object_path: &str,
        platform: Option<Platform>,
        cluster: &str,
    ) -> Result<Option<CatalogRecord>, CatalogError> {
        Ok(self
            .lookup_catalog_records(object_path, platform, cluster)?
            .into_iter()
            .next())
    }

    /// Direct dependency edges of a dataset, in catalog order.
    fn lookup_dependency_edges(&self, dataset_id: i64) -> Result<Vec<DependencyEdge>, CatalogError>;

    /// Immediate parent urns of a dataset.
    fn lookup_direct_parents(&self, urn: &str) -> Result<BTreeSet<String>, CatalogError>;

    /// Datasets with a dependency edge onto `dataset_id`.
    fn lookup_dependents(&self, dataset_id: i64) -> Result<Vec<DependentRecord>, CatalogError>;

    /// Datasets depending on `path` (or anything below it) of the given object type.
    fn lookup_dependents_by_name(
        &self,
        object_type: &str,
        path: &str,
    ) -> Result<Vec<DependentRecord>, CatalogError>;

    /// Gets a dataset by id.
    fn dataset_by_id(&self, id: i64) -> Result<Option<DatasetEntry>, CatalogError>;

    /// Gets a dataset by urn.
    fn dataset_by_urn(&self, urn: &str) -> Result<Option<DatasetEntry>, CatalogError>;

    /// Urns whose properties match a SQL `LIKE` pattern.
    fn urns_with_properties_like(&self, pattern: &str) -> Result<Vec<String>, CatalogError>;

    /// Most recently modified valid dataset of a platform type inside `window`.
    fn latest_of_type(
        &self,
        dataset_type: &str,
        window: &TimeWindow,
    ) -> Result<Option<String>, CatalogError>;
}
