//! Common-ancestor lookups.
//!
//! Only immediate parents are compared; there is no transitive closure.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{Catalog, CatalogError};
use crate::config::ConfigError;

/// How the second parent set is fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AncestorMode {
    /// Intersect the parents of both urns.
    #[default]
    Corrected,
    /// Fetch the parents of the first urn twice, matching the legacy
    /// service. The result is always the first urn's parent set.
    Literal,
}

impl fmt::Display for AncestorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AncestorMode::Corrected => f.write_str("corrected"),
            AncestorMode::Literal => f.write_str("literal"),
        }
    }
}

impl FromStr for AncestorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corrected" => Ok(AncestorMode::Corrected),
            "literal" => Ok(AncestorMode::Literal),
            other => Err(ConfigError::Invalid(format!("unknown ancestor mode: {other}"))),
        }
    }
}

/// Intersects the direct parents of two datasets.
pub struct AncestorResolver<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    mode: AncestorMode,
}

impl<'a, C: Catalog + ?Sized> AncestorResolver<'a, C> {
    pub fn new(catalog: &'a C, mode: AncestorMode) -> Self {
        Self { catalog, mode }
    }

    pub fn mode(&self) -> AncestorMode {
        self.mode
    }

    /// Direct parents of `urn`.
    pub fn parents(&self, urn: &str) -> Result<BTreeSet<String>, CatalogError> {
        let parents = self.catalog.lookup_direct_parents(urn)?;
        if parents.is_empty() {
            warn!(urn, "no parents found for dataset");
        }
        Ok(parents)
    }

    /// Parents shared by `urn_a` and `urn_b`. Empty when there are none.
    pub fn common_ancestors(
        &self,
        urn_a: &str,
        urn_b: &str,
    ) -> Result<BTreeSet<String>, CatalogError> {
        let first = self.parents(urn_a)?;
        let second = match self.mode {
            AncestorMode::Corrected => self.parents(urn_b)?,
            AncestorMode::Literal => {
                warn!(urn_a, urn_b, "literal ancestor mode ignores the second urn");
                self.parents(urn_a)?
            }
        };

        Ok(first.intersection(&second).cloned().collect())
    }
}
