use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lineage::embedder::{self, EmbeddingCache, OllamaEmbedderBuilder};
use lineage::report::{self, Summary};
use lineage::{RelationshipValidator, ValidatorConfig, load_records};
use tracing_subscriber::EnvFilter;

/// lineage - embedding-based hierarchy relationship validator
#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "Validate parent-child hierarchy relationships by embedding similarity")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Validate the relationships in a dataset and suggest better parents
    Validate(ValidateCommand),
}

/// Validate a dataset
#[derive(Parser)]
struct ValidateCommand {
    /// Path to the JSON dataset (array of records)
    #[arg(long, value_name = "FILE")]
    data: PathBuf,

    /// Path to the embedding cache file (defaults to the per-user data dir)
    #[arg(long, value_name = "FILE")]
    cache: Option<PathBuf>,

    /// Minimum similarity for an existing relationship to be VALID
    #[arg(long, value_name = "SCORE", default_value_t = 0.65)]
    validity_threshold: f32,

    /// Minimum similarity for a candidate to be suggested
    #[arg(long, value_name = "SCORE", default_value_t = 0.65)]
    suggestion_threshold: f32,

    /// Maximum number of suggested parents per record
    #[arg(long, value_name = "N", default_value_t = 3)]
    top_n: usize,

    /// Embedding model name (overrides OLLAMA_EMBED_MODEL)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Require a cache hit; never call the embedding API
    #[arg(long)]
    offline: bool,

    /// Write CSV export files with this path stem
    #[arg(long, value_name = "STEM")]
    export: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() {
    // .env first so RUST_LOG and OLLAMA_* set there are visible below.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Validate(cmd) => handle_validate(cmd),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include a missing or malformed dataset file and an offline
/// run without a populated cache. Internal errors include embedding API and
/// I/O failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    let message = format!("{error:#}");
    message.contains("dataset file")
        || message.contains("must be a JSON array")
        || message.contains("no cached embeddings")
}

/// Handles the validate command end to end.
fn handle_validate(cmd: &ValidateCommand) -> Result<()> {
    let records = load_records(&cmd.data)?;

    let cache_path = match &cmd.cache {
        Some(path) => path.clone(),
        None => default_cache_path()?,
    };
    ensure_parent_directory(&cache_path)?;
    let cache = EmbeddingCache::new(&cache_path);

    let embeddings = if cmd.offline {
        cache
            .load()
            .context("Failed to read embedding cache")?
            .with_context(|| {
                format!(
                    "no cached embeddings at {} (run once without --offline to populate the cache)",
                    cache_path.display()
                )
            })?
    } else {
        let client = OllamaEmbedderBuilder::new()
            .build()
            .context("Failed to create embedding client")?;
        let model = cmd
            .model
            .clone()
            .unwrap_or_else(|| client.model().to_string());
        embedder::get_or_create(&cache, &client, &model, &records)
            .context("Failed to resolve embeddings")?
    };

    let validator = RelationshipValidator::new(records, embeddings)
        .context("Embedding cache does not match the dataset")?;

    let config = ValidatorConfig {
        validity_threshold: cmd.validity_threshold,
        suggestion_threshold: cmd.suggestion_threshold,
        max_suggestions: cmd.top_n,
    };
    let results = validator.validate(&config);
    let summary = Summary::from_results(&results);

    print!("{}", report::render_table(&results));
    println!();
    println!(
        "{} validated: {} valid, {} invalid ({:.1}% pass rate)",
        summary.total, summary.valid, summary.invalid, summary.pass_rate
    );

    if let Some(stem) = &cmd.export {
        let (current, suggestions) =
            report::write_csv(&results, stem).context("Failed to write CSV export")?;
        println!(
            "Exported {} and {}",
            current.display(),
            suggestions.display()
        );
    }

    if let Some(path) = &cmd.json {
        report::write_json(&results, &summary, path).context("Failed to write JSON report")?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Gets the cross-platform default embedding cache path.
///
/// Returns the path as `{data_dir}/lineage/embeddings.json` where `data_dir`
/// is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
fn default_cache_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("lineage").join("embeddings.json"))
}

/// Ensures the parent directory of the given file exists.
fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
