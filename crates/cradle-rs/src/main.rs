//! Command-line access to Cradle's name tools and content partitions.

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use cradle_rs::config::{CradleConfig, LayeredConfigOptions};
use cradle_rs::names::{combine_names, score_compatibility, zodiac_sign};
use cradle_rs::store::{Fields, ItemStore, KeyValueStorage};
use cradle_rs::{Favorites, init_logging, open_partition, open_storage};
use log::{debug, info};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line options for the Cradle tool.
#[derive(Parser)]
#[command(name = "cradle", version)]
struct Cli {
    /// Extra cradle.json5 file applied over the discovered layers
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Blend two names into new name ideas
    Combine { first: String, second: String },
    /// Score how well two sibling names go together
    Compat { first: String, second: String },
    /// Zodiac sign and example names for a birth date (YYYY-MM-DD)
    Zodiac { date: String },
    /// Edit content partitions
    #[command(subcommand)]
    Items(ItemsCommand),
    /// Manage favorite names
    #[command(subcommand)]
    Favorites(FavoritesCommand),
}

#[derive(Subcommand)]
enum ItemsCommand {
    /// List every record in a partition
    List { partition: String },
    /// Show one record
    Get { partition: String, id: String },
    /// Add a record from a JSON object
    Add { partition: String, fields: String },
    /// Merge a JSON object into a record
    Update {
        partition: String,
        id: String,
        fields: String,
    },
    /// Delete one or more records
    Delete {
        partition: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// List saved favorites
    List,
    /// Save a favorite
    Add(FavoriteArgs),
    /// Remove a favorite
    Remove { name: String },
    /// Save or remove a favorite
    Toggle { name: String },
}

#[derive(Args)]
struct FavoriteArgs {
    name: String,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    meaning: Option<String>,
}

/// Entry point for the Cradle CLI.
fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    info!("starting cradle (config_set={})", cli.config.is_some());
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Combine { first, second } => {
            let combinations =
                combine_names(&first, &second).context("failed to combine names")?;
            print_json(&combinations)
        }
        Command::Compat { first, second } => {
            let report =
                score_compatibility(&first, &second).context("failed to score names")?;
            print_json(&report)
        }
        Command::Zodiac { date } => {
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid date {date:?}, expected YYYY-MM-DD"))?;
            let sign = zodiac_sign(date);
            print_json(&json!({
                "sign": sign,
                "name": sign.display_name(),
                "dates": sign.date_range(),
                "element": sign.element(),
                "names": sign.example_names(),
            }))
        }
        Command::Items(command) => {
            let storage = open_storage(&config.storage).context("failed to open storage")?;
            run_items(&config, storage, command)
        }
        Command::Favorites(command) => {
            let storage = open_storage(&config.storage).context("failed to open storage")?;
            run_favorites(&config, storage, command)
        }
    }
}

fn load_config(runtime_path: Option<&Path>) -> anyhow::Result<CradleConfig> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = runtime_path {
        options = options.with_runtime_path(path);
    }
    let layered =
        CradleConfig::load_layered_with_options(options).context("failed to load config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

fn run_items(
    config: &CradleConfig,
    storage: Arc<dyn KeyValueStorage>,
    command: ItemsCommand,
) -> anyhow::Result<()> {
    match command {
        ItemsCommand::List { partition } => {
            let mut store = open_items(config, storage, &partition)?;
            report_issue(&mut store);
            print_json(&store.items())
        }
        ItemsCommand::Get { partition, id } => {
            let mut store = open_items(config, storage, &partition)?;
            report_issue(&mut store);
            match store.get(&id) {
                Some(record) => print_json(record),
                None => bail!("no record {id} in partition {partition}"),
            }
        }
        ItemsCommand::Add { partition, fields } => {
            let fields = parse_fields(&fields)?;
            let mut store = open_items(config, storage, &partition)?;
            let record = store.add(fields);
            report_issue(&mut store);
            print_json(&record)
        }
        ItemsCommand::Update {
            partition,
            id,
            fields,
        } => {
            let fields = parse_fields(&fields)?;
            let mut store = open_items(config, storage, &partition)?;
            let updated = store.update(&id, fields);
            report_issue(&mut store);
            match updated {
                Some(record) => print_json(&record),
                None => bail!("no record {id} in partition {partition}"),
            }
        }
        ItemsCommand::Delete { partition, ids } => {
            let mut store = open_items(config, storage, &partition)?;
            let removed = store.bulk_delete(&ids);
            report_issue(&mut store);
            print_json(&json!({ "requested": ids.len(), "removed": removed }))
        }
    }
}

fn run_favorites(
    config: &CradleConfig,
    storage: Arc<dyn KeyValueStorage>,
    command: FavoritesCommand,
) -> anyhow::Result<()> {
    let mut favorites = Favorites::open(&config.favorites.partition, storage);
    let output = match command {
        FavoritesCommand::List => json!(favorites.records()),
        FavoritesCommand::Add(args) => {
            let record = favorites
                .add(&args.name, args.gender.as_deref(), args.meaning.as_deref())
                .context("failed to add favorite")?;
            json!(record)
        }
        FavoritesCommand::Remove { name } => {
            json!({ "name": name, "removed": favorites.remove(&name) })
        }
        FavoritesCommand::Toggle { name } => {
            let saved = favorites
                .toggle(&name)
                .context("failed to toggle favorite")?;
            json!({ "name": name, "saved": saved })
        }
    };
    while let Some(issue) = favorites.take_issue() {
        eprintln!("warning: {issue}");
    }
    print_json(&output)
}

/// Parse a JSON object argument into record fields.
fn parse_fields(raw: &str) -> anyhow::Result<Fields> {
    match serde_json::from_str::<Value>(raw).context("fields must be valid JSON")? {
        Value::Object(fields) => Ok(fields),
        other => bail!("fields must be a JSON object, got {other}"),
    }
}

fn open_items(
    config: &CradleConfig,
    storage: Arc<dyn KeyValueStorage>,
    partition: &str,
) -> anyhow::Result<ItemStore> {
    open_partition(config, storage, partition)
        .with_context(|| format!("cannot open partition {partition:?}"))
}

/// Print store issues without failing the command.
fn report_issue(store: &mut ItemStore) {
    while let Some(issue) = store.take_issue() {
        eprintln!("warning: {issue}");
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
