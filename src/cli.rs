use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use collrun::CollectionLoader;
use collrun::http::HttpClient;
use collrun::runner::{CollectionRunner, RunReporter, RunSummary};
use collrun::variable::{ConfigLoader, VariableStore};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run requests from a Postman collection
    Run(RunArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to the collection JSON file
    pub collection: PathBuf,

    /// Request names to run in order; runs the whole collection when empty
    pub names: Vec<String>,

    /// Environment from collrun.toml
    #[arg(short, long)]
    pub env: Option<String>,

    /// Explicit config file instead of searching for collrun.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Postman environment export to load
    #[arg(long)]
    pub environment_file: Option<PathBuf>,

    /// Variable override, KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Print decoded response bodies
    #[arg(short, long)]
    pub verbose: bool,

    /// Stop at the first failed request
    #[arg(long)]
    pub bail: bool,
}

/// Precedence, lowest first: collection variables (added by the runner),
/// config environment, environment file, --var.
fn build_store(args: &RunArgs) -> Result<VariableStore> {
    let mut store = VariableStore::new();

    if let Some(env_name) = &args.env {
        let config = match &args.config {
            Some(path) => ConfigLoader::load_from_path(path)?,
            None => ConfigLoader::find_and_load()?.context("no collrun.toml found")?,
        };
        ConfigLoader::apply_environment(&mut store, &config, env_name)?;
    }

    if let Some(path) = &args.environment_file {
        let values = ConfigLoader::load_postman_environment(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        store.extend(values);
    }

    for var in &args.vars {
        let (key, value) = ConfigLoader::parse_cli_var(var)
            .with_context(|| format!("invalid --var '{}', expected KEY=VALUE", var))?;
        store.set(key, value);
    }

    tracing::debug!("Starting run with {} variables", store.len());
    Ok(store)
}

/// Returns whether every request succeeded
pub async fn run(args: RunArgs) -> Result<bool> {
    let collection = CollectionLoader::load_from_path(&args.collection)
        .with_context(|| format!("failed to load {}", args.collection.display()))?;
    let store = build_store(&args)?;

    let collection_name = collection.name.clone();
    let total = if args.names.is_empty() {
        collrun::collection::requests(&collection.items).len()
    } else {
        args.names.len()
    };

    let mut runner = CollectionRunner::new(collection, store, HttpClient::new()?);
    let reporter = RunReporter::new(args.verbose);
    reporter.print_header(&collection_name, total);

    let results = if args.names.is_empty() {
        runner.run_all(args.bail).await
    } else {
        runner.run_named(&args.names, args.bail).await
    };

    for result in &results {
        reporter.print_result(result);
    }

    let summary = RunSummary::from_results(&results);
    reporter.print_summary(&summary);

    Ok(summary.failed == 0)
}
