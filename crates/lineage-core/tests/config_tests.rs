use lineage_core::config::{
    DEFAULT_CLUSTER, DEFAULT_LOG_FILTER, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES,
};
use lineage_core::{AncestorMode, Config, ConfigError};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.catalog.default_cluster, DEFAULT_CLUSTER);
    assert_eq!(config.catalog.platforms, vec!["hive", "dalids"]);
    assert!(config.catalog.snapshot_path.is_none());
    assert_eq!(config.traversal.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(config.traversal.max_nodes, DEFAULT_MAX_NODES);
    assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
}

#[test]
fn test_config_to_toml() {
    let toml_str = Config::default_config_string();
    assert!(toml_str.contains("[catalog]"));
    assert!(toml_str.contains("[traversal]"));
    assert!(toml_str.contains("[ancestors]"));
    assert!(toml_str.contains("[logging]"));
    assert!(toml_str.contains("mode = \"corrected\""));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[catalog]
default_cluster = "lva1-war"
snapshot_path = "/var/lib/lineage/catalog.yaml"

[traversal]
max_depth = 8

[ancestors]
mode = "literal"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.catalog.default_cluster, "lva1-war");
    assert_eq!(
        config.catalog.snapshot_path.as_deref(),
        Some(std::path::Path::new("/var/lib/lineage/catalog.yaml"))
    );
    assert_eq!(config.traversal.max_depth, 8);
    // Unset keys keep their defaults.
    assert_eq!(config.traversal.max_nodes, DEFAULT_MAX_NODES);
    assert_eq!(config.ancestors.mode, AncestorMode::Literal);
}

#[test]
fn test_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("lineage.toml");
    std::fs::write(&path, "[traversal]\nmax_nodes = 50\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.traversal.max_nodes, 50);
}

#[test]
fn test_from_file_rejects_invalid_values() {
    let temp = TempDir::new().unwrap();

    let path = temp.path().join("blank_cluster.toml");
    std::fs::write(&path, "[catalog]\ndefault_cluster = \"  \"\n").unwrap();
    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::Invalid(_))
    ));

    let path = temp.path().join("platforms.toml");
    std::fs::write(&path, "[catalog]\nplatforms = [\"hive\", \"kafka\"]\n").unwrap();
    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::Invalid(_))
    ));

    let path = temp.path().join("broken.toml");
    std::fs::write(&path, "[traversal\n").unwrap();
    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        Config::from_file(temp.path().join("nope.toml")),
        Err(ConfigError::ReadError(_))
    ));
}

#[test]
fn test_ancestor_mode_in_toml() {
    let config: Config = toml::from_str("[ancestors]\nmode = \"corrected\"\n").unwrap();
    assert_eq!(config.ancestors.mode, AncestorMode::Corrected);

    assert!(toml::from_str::<Config>("[ancestors]\nmode = \"both\"\n").is_err());
}
