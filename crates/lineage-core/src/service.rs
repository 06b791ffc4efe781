use thiserror::Error;
use tracing::{debug, info};

use crate::ancestors::AncestorResolver;
use crate::catalog::{Catalog, CatalogError};
use crate::config::{Config, ConfigError, MSG_MALFORMED_URI, MSG_NO_DEPENDENCY_DATA};
use crate::latest::TimeWindow;
use crate::resolver::{LineageResolver, ResolveError};
use crate::response::{
    AncestorResponse, DatasetResponse, DependentsResponse, LatestResponse, LineageResponse,
    PropertySearchResponse, ReturnCode,
};
use crate::tree::TreeError;
use crate::uri::UriNormalizer;

/// Answers lineage queries against a catalog.
///
/// Expected "no data" outcomes come back as responses carrying a
/// [`ReturnCode`]; only catalog and traversal failures are errors.
pub struct LineageService<C: Catalog> {
    catalog: C,
    config: Config,
    normalizer: UriNormalizer,
}

impl<C: Catalog> LineageService<C> {
    /// Creates a service over `catalog`, validating `config` first.
    pub fn new(catalog: C, config: Config) -> Result<Self, ServiceError> {
        config.validate()?;
        let normalizer = UriNormalizer::new(config.catalog.recognized_platforms()?);
        Ok(Self {
            catalog,
            config,
            normalizer,
        })
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolver bound to this service's catalog and settings.
    pub fn resolver(&self) -> LineageResolver<'_, C> {
        LineageResolver::new(
            &self.catalog,
            self.normalizer.clone(),
            self.config.catalog.default_cluster.clone(),
            self.config.traversal.clone(),
        )
    }

    /// Ancestor resolver using the configured mode.
    pub fn ancestor_resolver(&self) -> AncestorResolver<'_, C> {
        AncestorResolver::new(&self.catalog, self.config.ancestors.mode)
    }

    /// Resolves the lineage of `uri`.
    pub fn get_lineage(
        &self,
        uri: &str,
        cluster: Option<&str>,
    ) -> Result<LineageResponse, ServiceError> {
        match self.resolver().resolve(uri, cluster) {
            Ok(report) => Ok(LineageResponse::found(report)),
            Err(ResolveError::MalformedUri(e)) => {
                debug!(error = %e, "rejected dataset uri");
                Ok(LineageResponse::empty(ReturnCode::NotFound, MSG_MALFORMED_URI))
            }
            Err(ResolveError::NoDependencyData {
                object_path,
                cluster,
            }) => {
                info!(object_path = %object_path, cluster = %cluster, "no catalog entry");
                Ok(LineageResponse::empty(ReturnCode::Ok, MSG_NO_DEPENDENCY_DATA))
            }
            Err(ResolveError::Catalog(e)) => Err(e.into()),
            Err(ResolveError::Tree(e)) => Err(e.into()),
        }
    }

    /// Parents shared by two datasets.
    pub fn get_common_ancestors(
        &self,
        urn_a: &str,
        urn_b: &str,
    ) -> Result<AncestorResponse, ServiceError> {
        let common = self.ancestor_resolver().common_ancestors(urn_a, urn_b)?;
        Ok(AncestorResponse::from_parents(common))
    }

    /// Datasets with a dependency edge onto `dataset_id`.
    pub fn get_dependents(&self, dataset_id: i64) -> Result<DependentsResponse, ServiceError> {
        Ok(self.catalog.lookup_dependents(dataset_id)?.into())
    }

    /// Datasets depending on `path` (or below it) of the given object type.
    pub fn get_dependents_by_name(
        &self,
        object_type: &str,
        path: &str,
    ) -> Result<DependentsResponse, ServiceError> {
        Ok(self
            .catalog
            .lookup_dependents_by_name(object_type, path)?
            .into())
    }

    /// Gets a dataset by urn.
    pub fn get_dataset(&self, urn: &str) -> Result<DatasetResponse, ServiceError> {
        let dataset = self.catalog.dataset_by_urn(urn)?;
        Ok(DatasetResponse::from_lookup(dataset, urn))
    }

    /// Gets a dataset by id.
    pub fn get_dataset_by_id(&self, id: i64) -> Result<DatasetResponse, ServiceError> {
        let dataset = self.catalog.dataset_by_id(id)?;
        Ok(DatasetResponse::from_lookup(dataset, &id.to_string()))
    }

    /// Urn of the most recently modified valid dataset of `dataset_type`.
    pub fn get_latest(
        &self,
        dataset_type: &str,
        window: TimeWindow,
    ) -> Result<LatestResponse, ServiceError> {
        if dataset_type.trim().is_empty() {
            return Ok(LatestResponse::default());
        }
        let urn = self.catalog.latest_of_type(dataset_type, &window)?;
        Ok(LatestResponse::from_urn(urn))
    }

    /// Urns whose properties match a SQL `LIKE` pattern.
    ///
    /// Properties are compared as compact JSON; `"valid": "true"` and
    /// `"valid":"true"` in a pattern are equivalent.
    pub fn find_urns_by_properties(
        &self,
        pattern: &str,
    ) -> Result<PropertySearchResponse, ServiceError> {
        if pattern.trim().is_empty() {
            return Ok(PropertySearchResponse::default());
        }
        Ok(self.catalog.urns_with_properties_like(pattern)?.into())
    }
}

/// Errors that can occur in LineageService operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Traversal error: {0}")]
    Traversal(TreeError),
}

impl From<TreeError> for ServiceError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::Catalog(e) => ServiceError::Catalog(e),
            other => ServiceError::Traversal(other),
        }
    }
}
