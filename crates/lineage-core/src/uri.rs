//! Dataset URI parsing and normalization.
//!
//! Datasets arrive under several URI grammars. All of them reduce to a
//! [`DatasetIdentity`]:
//!
//! ```text
//! hive:///db.table            platform, default cluster
//! dalids:///db/table
//! hive://cluster.db.table     platform, explicit cluster
//! dalids://cluster/db/table
//! cluster:db.table            generic, explicit cluster
//! db.table                    generic, default cluster
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_PLATFORMS;

/// Data-system family encoded in a dataset URI scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Hive,
    Dalids,
    /// No recognized scheme prefix.
    #[default]
    Generic,
}

impl Platform {
    /// URI scheme for recognized platforms.
    pub fn scheme(&self) -> Option<&'static str> {
        match self {
            Platform::Hive => Some("hive"),
            Platform::Dalids => Some("dalids"),
            Platform::Generic => None,
        }
    }

    /// Returns true for platforms with their own URI scheme.
    pub fn is_recognized(&self) -> bool {
        self.scheme().is_some()
    }

    /// Maps a catalog `dataset_type` onto a platform.
    pub fn from_dataset_type(dataset_type: &str) -> Self {
        dataset_type.parse().unwrap_or(Platform::Generic)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme().unwrap_or("generic"))
    }
}

impl FromStr for Platform {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hive" => Ok(Platform::Hive),
            "dalids" => Ok(Platform::Dalids),
            "generic" => Ok(Platform::Generic),
            _ => Err(UriError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Canonical identity of a dataset.
///
/// Cluster, database and table are never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetIdentity {
    pub platform: Platform,
    pub cluster: String,
    pub database: String,
    pub table: String,
}

impl DatasetIdentity {
    /// Object path used as the catalog lookup key: `/database/table`.
    pub fn object_path(&self) -> String {
        format!("/{}/{}", self.database, self.table)
    }

    /// Reconstructs the URI in canonical form.
    ///
    /// `platform://cluster/db/table` for recognized platforms, otherwise
    /// `cluster/db/table`.
    pub fn canonical_uri(&self) -> String {
        let path = format!("{}/{}/{}", self.cluster, self.database, self.table);
        match self.platform.scheme() {
            Some(scheme) => format!("{scheme}://{path}"),
            None => path,
        }
    }
}

impl fmt::Display for DatasetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_uri())
    }
}

/// Errors produced while normalizing a URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("Dataset URI is blank")]
    Blank,

    #[error("Malformed dataset URI {uri:?}: {reason}")]
    Malformed { uri: String, reason: &'static str },

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

impl UriError {
    fn malformed(uri: &str, reason: &'static str) -> Self {
        UriError::Malformed {
            uri: uri.to_string(),
            reason,
        }
    }
}

/// Splits on `.` and `/`, dropping trailing empty segments.
pub(crate) fn split_segments(input: &str) -> Vec<&str> {
    trim_trailing_empty(input.split(['.', '/']).collect())
}

/// Splits a location path on `/`, dropping trailing empty segments.
pub(crate) fn split_path(input: &str) -> Vec<&str> {
    trim_trailing_empty(input.split('/').collect())
}

fn trim_trailing_empty(mut segments: Vec<&str>) -> Vec<&str> {
    while segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Text following the first occurrence of `prefix`.
fn after<'a>(uri: &'a str, prefix: &str) -> Option<&'a str> {
    uri.find(prefix).map(|index| &uri[index + prefix.len()..])
}

struct Parts<'a> {
    platform: Platform,
    cluster: Option<&'a str>,
    database: &'a str,
    table: &'a str,
}

/// Parses raw dataset URIs against a set of recognized platforms.
#[derive(Debug, Clone)]
pub struct UriNormalizer {
    platforms: Vec<Platform>,
}

impl Default for UriNormalizer {
    fn default() -> Self {
        Self {
            platforms: DEFAULT_PLATFORMS
                .iter()
                .filter_map(|name| name.parse().ok())
                .collect(),
        }
    }
}

impl UriNormalizer {
    /// Creates a normalizer recognizing the given platforms, checked in order.
    pub fn new(platforms: Vec<Platform>) -> Self {
        let platforms = platforms
            .into_iter()
            .filter(Platform::is_recognized)
            .collect();
        Self { platforms }
    }

    /// Platforms whose prefixes this normalizer looks for.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Normalizes `raw_uri` into a [`DatasetIdentity`].
    ///
    /// `default_cluster` fills in the cluster for grammars that omit it.
    pub fn normalize(
        &self,
        raw_uri: &str,
        default_cluster: &str,
    ) -> Result<DatasetIdentity, UriError> {
        if is_blank(raw_uri) {
            return Err(UriError::Blank);
        }

        let parts = self
            .match_grammar(raw_uri)
            .map_err(|reason| UriError::malformed(raw_uri, reason))?;
        let cluster = parts.cluster.unwrap_or(default_cluster);

        if is_blank(cluster) {
            return Err(UriError::malformed(raw_uri, "cluster is blank"));
        }
        if is_blank(parts.database) {
            return Err(UriError::malformed(raw_uri, "database is blank"));
        }
        if is_blank(parts.table) {
            return Err(UriError::malformed(raw_uri, "table is blank"));
        }

        Ok(DatasetIdentity {
            platform: parts.platform,
            cluster: cluster.to_string(),
            database: parts.database.to_string(),
            table: parts.table.to_string(),
        })
    }

    // First matching prefix decides the grammar; a bad segment count after a
    // matched prefix does not fall through to the next rule.
    fn match_grammar<'a>(&self, uri: &'a str) -> Result<Parts<'a>, &'static str> {
        for &platform in &self.platforms {
            let Some(scheme) = platform.scheme() else {
                continue;
            };
            if let Some(rest) = after(uri, &format!("{scheme}:///")) {
                return match split_segments(rest).as_slice() {
                    &[database, table] => Ok(Parts {
                        platform,
                        cluster: None,
                        database,
                        table,
                    }),
                    _ => Err("expected <database>.<table> after the platform prefix"),
                };
            }
        }

        for &platform in &self.platforms {
            let Some(scheme) = platform.scheme() else {
                continue;
            };
            if let Some(rest) = after(uri, &format!("{scheme}://")) {
                return match split_segments(rest).as_slice() {
                    &[cluster, database, table] => Ok(Parts {
                        platform,
                        cluster: Some(cluster),
                        database,
                        table,
                    }),
                    _ => Err("expected <cluster>.<database>.<table> after the platform prefix"),
                };
            }
        }

        if uri.contains('.') {
            let (cluster, rest) = match uri.split_once(':') {
                Some((cluster, rest)) => (Some(cluster), rest),
                None => (None, uri),
            };
            return match split_segments(rest).as_slice() {
                &[database, table] => Ok(Parts {
                    platform: Platform::Generic,
                    cluster,
                    database,
                    table,
                }),
                _ => Err("expected [cluster:]<database>.<table>"),
            };
        }

        Err("no recognized platform prefix and no '.' separator")
    }
}

/// Normalizes `raw_uri` with the default platform set.
pub fn normalize(raw_uri: &str, default_cluster: &str) -> Result<DatasetIdentity, UriError> {
    UriNormalizer::default().normalize(raw_uri, default_cluster)
}
