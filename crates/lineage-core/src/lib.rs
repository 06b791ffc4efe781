pub mod ancestors;
pub mod catalog;
pub mod config;
pub mod latest;
pub mod resolver;
pub mod response;
pub mod service;
pub mod tree;
pub mod uri;

pub use ancestors::{AncestorMode, AncestorResolver};
pub use catalog::{
    Catalog, CatalogError, CatalogRecord, CatalogSnapshot, DatasetEntry, DependencyEdge,
    DependentRecord, FileCatalog,
};
pub use config::{Config, ConfigError, TraversalConfig};
pub use latest::TimeWindow;
pub use resolver::{DependencyReport, LineageResolver, ResolveError};
pub use response::{
    AncestorResponse, DatasetResponse, DependentsResponse, LatestResponse, LineageResponse,
    PropertySearchResponse, ReturnCode,
};
pub use service::{LineageService, ServiceError};
pub use tree::{DependencyRecord, DependencyTree, DependencyTreeBuilder, TreeError};
pub use uri::{normalize, DatasetIdentity, Platform, UriError, UriNormalizer};
