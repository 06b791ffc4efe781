//! Default values for lineage configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Catalog Defaults
// ============================================================================

/// Cluster assumed when a URI does not name one.
pub const DEFAULT_CLUSTER: &str = "ltx1-holdem";

/// Platforms whose URI schemes are recognized by the normalizer.
pub const DEFAULT_PLATFORMS: &[&str] = &["hive", "dalids"];

/// Project-local configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "lineage.toml";

/// Directory under the user config dir holding `config.toml`.
pub const DEFAULT_CONFIG_DIR: &str = "lineage";

// ============================================================================
// Traversal Defaults
// ============================================================================

/// Deepest dependency level expanded before giving up.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Maximum number of dependency records in a single tree.
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Multiplier applied to the 1-based sibling index in topology sort ids.
pub const SORT_ID_STEP: usize = 100;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "lineage_core=info,lineage_cli=info";

// ============================================================================
// Response Messages
// ============================================================================

/// Message returned when a lineage URI cannot be parsed.
pub const MSG_MALFORMED_URI: &str = "Wrong input format! Missing dataset uri";

/// Message returned when the catalog has no row for a dataset.
pub const MSG_NO_DEPENDENCY_DATA: &str = "Dependency information is not available.";

/// Message returned when two datasets share no parents.
pub const MSG_NO_COMMON_PARENTS: &str = "No common parents found";

/// Message returned when no dataset matches a latest-of-type query.
pub const MSG_NONE_FOUND: &str = "none found";
