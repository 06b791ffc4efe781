use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lineage_core::{AncestorMode, Config, FileCatalog, LineageService, TimeWindow};

#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "Dataset lineage queries against a catalog snapshot", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./lineage.toml, then the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog snapshot in JSON or YAML; overrides catalog.snapshot_path
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a dataset URI into its dependency tree
    Resolve {
        /// Dataset URI, e.g. hive:///db/table or cluster:db.table
        uri: String,
        /// Cluster used when the URI does not name one
        #[arg(long)]
        cluster: Option<String>,
    },
    /// Find the parents shared by two datasets
    Ancestors {
        urn_a: String,
        urn_b: String,
        /// Use the legacy lookup that only reads the first urn's parents
        #[arg(long)]
        literal: bool,
    },
    /// List datasets that depend on a dataset
    Dependents {
        /// Dataset id of the dependency
        #[arg(long, conflicts_with_all = ["object_type", "path"])]
        id: Option<i64>,
        /// Mapped object type, e.g. hdfs
        #[arg(long = "type", requires = "path")]
        object_type: Option<String>,
        /// Mapped object path; anything below it matches too
        #[arg(long, requires = "object_type")]
        path: Option<String>,
    },
    /// Show the latest valid dataset of a platform type
    #[command(group(ArgGroup::new("window").args(["after", "before", "at", "between"])))]
    Latest {
        /// Platform type, e.g. hive
        dataset_type: String,
        /// Only datasets modified after this time (RFC 3339 or epoch seconds)
        #[arg(long, value_parser = parse_time)]
        after: Option<DateTime<Utc>>,
        /// Only datasets modified before this time
        #[arg(long, value_parser = parse_time)]
        before: Option<DateTime<Utc>>,
        /// Only datasets modified exactly at this time
        #[arg(long, value_parser = parse_time)]
        at: Option<DateTime<Utc>>,
        /// Only datasets modified within [START, END]
        #[arg(long, num_args = 2, value_names = ["START", "END"], value_parser = parse_time)]
        between: Option<Vec<DateTime<Utc>>>,
    },
    /// Find dataset urns whose properties match a SQL LIKE pattern
    Search { pattern: String },
    /// Show a dataset by urn or id
    Dataset {
        /// Dataset urn
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        urn: Option<String>,
        /// Dataset id
        #[arg(long)]
        id: Option<i64>,
    },
    /// Print the default configuration
    InitConfig,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        print!("{}", Config::default_config_string());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => Config::load().wrap_err("failed to load config")?,
    };
    if let Commands::Ancestors { literal: true, .. } = cli.command {
        config.ancestors.mode = AncestorMode::Literal;
    }

    init_tracing(&config.logging.filter);

    let snapshot = cli
        .catalog
        .clone()
        .or_else(|| config.catalog.snapshot_path.clone())
        .ok_or_else(|| eyre!("no catalog snapshot; pass --catalog or set catalog.snapshot_path"))?;
    let catalog = FileCatalog::open(&snapshot)
        .wrap_err_with(|| format!("failed to open catalog {}", snapshot.display()))?;
    debug!(path = %snapshot.display(), mode = %config.ancestors.mode, "catalog ready");
    let service = LineageService::new(catalog, config)?;

    match cli.command {
        Commands::Resolve { uri, cluster } => {
            print_json(&service.get_lineage(&uri, cluster.as_deref())?)
        }
        Commands::Ancestors { urn_a, urn_b, .. } => {
            print_json(&service.get_common_ancestors(&urn_a, &urn_b)?)
        }
        Commands::Dependents {
            id,
            object_type,
            path,
        } => match (id, object_type, path) {
            (Some(id), _, _) => print_json(&service.get_dependents(id)?),
            (None, Some(object_type), Some(path)) => {
                print_json(&service.get_dependents_by_name(&object_type, &path)?)
            }
            _ => Err(eyre!("pass either --id or both --type and --path")),
        },
        Commands::Latest {
            dataset_type,
            after,
            before,
            at,
            between,
        } => {
            let window = time_window(after, before, at, between);
            print_json(&service.get_latest(&dataset_type, window)?)
        }
        Commands::Search { pattern } => print_json(&service.find_urns_by_properties(&pattern)?),
        Commands::Dataset { urn, id } => match (urn, id) {
            (_, Some(id)) => print_json(&service.get_dataset_by_id(id)?),
            (Some(urn), None) => print_json(&service.get_dataset(&urn)?),
            (None, None) => Err(eyre!("pass either a urn or --id")),
        },
        Commands::InitConfig => Ok(()),
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Accepts RFC 3339 timestamps or whole epoch seconds.
fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| format!("timestamp out of range: {value}"));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp {value:?}: {e}"))
}

fn time_window(
    after: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
    at: Option<DateTime<Utc>>,
    between: Option<Vec<DateTime<Utc>>>,
) -> TimeWindow {
    if let Some(time) = after {
        return TimeWindow::After { time };
    }
    if let Some(time) = before {
        return TimeWindow::Before { time };
    }
    if let Some(time) = at {
        return TimeWindow::At { time };
    }
    match between.as_deref() {
        Some(&[start, end]) => TimeWindow::Between { start, end },
        _ => TimeWindow::Any,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        let epoch = parse_time("60").unwrap();
        assert_eq!(epoch.timestamp(), 60);

        let rfc = parse_time("2024-01-02T03:04:05Z").unwrap();
        assert_eq!(rfc.timestamp(), 1_704_164_645);

        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn test_time_window() {
        let t = parse_time("100").unwrap();
        assert_eq!(time_window(None, None, None, None), TimeWindow::Any);
        assert_eq!(
            time_window(Some(t), None, None, None),
            TimeWindow::After { time: t }
        );
        assert_eq!(
            time_window(None, None, None, Some(vec![t, t])),
            TimeWindow::Between { start: t, end: t }
        );
    }

    #[test]
    fn test_cli_parses_resolve() {
        let cli = Cli::parse_from(["lineage", "--catalog", "c.json", "resolve", "hive:///a.b"]);
        assert!(matches!(cli.command, Commands::Resolve { ref uri, cluster: None } if uri == "hive:///a.b"));
        assert_eq!(cli.catalog, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn test_cli_parses_dataset_lookups() {
        let cli = Cli::parse_from(["lineage", "dataset", "--id", "42"]);
        assert!(matches!(cli.command, Commands::Dataset { urn: None, id: Some(42) }));

        let cli = Cli::parse_from(["lineage", "dataset", "hive:///a/b"]);
        assert!(matches!(cli.command, Commands::Dataset { ref urn, id: None } if urn.as_deref() == Some("hive:///a/b")));

        assert!(Cli::try_parse_from(["lineage", "dataset"]).is_err());
        assert!(Cli::try_parse_from(["lineage", "dataset", "hive:///a/b", "--id", "1"]).is_err());
    }
}
