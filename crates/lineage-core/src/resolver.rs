//! Lineage resolution: URI → catalog record → dependency tree → report.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError};
use crate::config::{Config, ConfigError, TraversalConfig};
use crate::tree::{DependencyRecord, DependencyTreeBuilder, TreeError};
use crate::uri::{DatasetIdentity, Platform, UriError, UriNormalizer};

/// Lineage of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub platform: Platform,
    pub deployment_tier: Option<String>,
    pub data_center: Option<String>,
    /// Catalog server cluster, or the requested cluster when the catalog has none.
    pub cluster: String,
    pub dataset_type: String,
    pub database_name: String,
    pub table_name: String,
    pub urn: String,
    pub dataset_id: i64,
    /// Canonical form of the requested URI.
    pub input_uri: String,
    pub dependencies: Vec<DependencyRecord>,
    pub leaf_level_dependency_count: usize,
}

/// Errors returned by [`LineageResolver::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    MalformedUri(#[from] UriError),

    #[error("No dependency data for {object_path} on cluster {cluster}")]
    NoDependencyData { object_path: String, cluster: String },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Traversal error: {0}")]
    Tree(#[from] TreeError),
}

/// Resolves a raw dataset URI into a [`DependencyReport`].
pub struct LineageResolver<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    normalizer: UriNormalizer,
    default_cluster: String,
    limits: TraversalConfig,
}

impl<'a, C: Catalog + ?Sized> LineageResolver<'a, C> {
    pub fn new(
        catalog: &'a C,
        normalizer: UriNormalizer,
        default_cluster: impl Into<String>,
        limits: TraversalConfig,
    ) -> Self {
        Self {
            catalog,
            normalizer,
            default_cluster: default_cluster.into(),
            limits,
        }
    }

    /// Builds a resolver from the `catalog` and `traversal` config sections.
    pub fn from_config(catalog: &'a C, config: &Config) -> Result<Self, ConfigError> {
        let normalizer = UriNormalizer::new(config.catalog.recognized_platforms()?);
        Ok(Self::new(
            catalog,
            normalizer,
            config.catalog.default_cluster.clone(),
            config.traversal.clone(),
        ))
    }

    /// Resolves `raw_uri`, using `cluster` (or the configured default) for
    /// grammars that do not name one.
    pub fn resolve(
        &self,
        raw_uri: &str,
        cluster: Option<&str>,
    ) -> Result<DependencyReport, ResolveError> {
        let default_cluster = cluster.unwrap_or(self.default_cluster.as_str());
        let identity = self.normalizer.normalize(raw_uri, default_cluster)?;
        let object_path = identity.object_path();

        let platform = identity
            .platform
            .is_recognized()
            .then_some(identity.platform);
        let records = self
            .catalog
            .lookup_catalog_records(&object_path, platform, &identity.cluster)?;
        if records.len() > 1 {
            debug!(
                object_path = %object_path,
                matches = records.len(),
                "multiple catalog rows, using the first"
            );
        }
        let Some(record) = records.into_iter().next() else {
            return Err(ResolveError::NoDependencyData {
                object_path,
                cluster: identity.cluster,
            });
        };

        let tree = DependencyTreeBuilder::new(self.catalog, self.limits.clone())
            .build(record.dataset_id)?;
        let leaf_level_dependency_count = tree.leaf_count();

        let input_uri = DatasetIdentity {
            platform: display_platform(identity.platform, &record.dataset_type),
            ..identity.clone()
        }
        .canonical_uri();

        let cluster = match record.server_cluster {
            Some(server_cluster) if !server_cluster.trim().is_empty() => server_cluster,
            _ => identity.cluster,
        };

        info!(
            urn = %record.urn,
            dependencies = tree.len(),
            leaves = leaf_level_dependency_count,
            "resolved lineage"
        );

        Ok(DependencyReport {
            platform: identity.platform,
            deployment_tier: record.deployment_tier,
            data_center: record.data_center,
            cluster,
            dataset_type: record.dataset_type,
            database_name: identity.database,
            table_name: identity.table,
            urn: record.urn,
            dataset_id: record.dataset_id,
            input_uri,
            dependencies: tree.into_records(),
            leaf_level_dependency_count,
        })
    }
}

/// Platform used to rebuild the input URI.
///
/// A generic URI that resolves to a hive or dalids dataset is shown with
/// that platform's scheme.
fn display_platform(requested: Platform, dataset_type: &str) -> Platform {
    if requested.is_recognized() {
        requested
    } else {
        Platform::from_dataset_type(dataset_type)
    }
}
