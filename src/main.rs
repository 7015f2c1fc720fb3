use ragpipe::cli::{Cli, Commands, ConfigAction};
use ragpipe::config::Config;
use ragpipe::embedding::FastEmbedProvider;
use ragpipe::error::{RagError, Result};
use ragpipe::logger::QueryLogger;
use ragpipe::retriever::Retriever;
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Ingest { path, pattern } => {
            cmd_ingest(cli.config, &path, &pattern)?;
        }
        Commands::Query { text, top_k, json } => {
            cmd_query(cli.config, &text, top_k, json)?;
        }
        Commands::Logs { count } => {
            cmd_logs(cli.config, count)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragpipe=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Load configuration from the given path, or the default location,
/// falling back to built-in defaults when no file exists.
fn load_config(config_path: Option<std::path::PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if path.exists() {
        Config::load(&path)
    } else {
        tracing::warn!(
            "No config file at {}, using built-in defaults",
            path.display()
        );
        Ok(Config::default())
    }
}

fn build_retriever(config: &Config) -> Result<Retriever> {
    let chunker = config.build_chunker()?;
    let embedder = Arc::new(FastEmbedProvider::new(&config.embedding.model)?);

    let snapshot = config.snapshot_path();
    if snapshot.exists() {
        tracing::info!("Loading retriever snapshot from {}", snapshot.display());
        Retriever::load_snapshot(&snapshot, chunker, embedder)
    } else {
        Ok(Retriever::new(chunker, embedder))
    }
}

fn cmd_ingest(
    config_path: Option<std::path::PathBuf>,
    path: &Path,
    pattern: &str,
) -> Result<()> {
    let config = load_config(config_path)?;
    let mut retriever = build_retriever(&config)?;

    if path.is_dir() {
        let outcomes = retriever.add_directory(path, pattern)?;

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        for outcome in &outcomes {
            match outcome {
                Ok(ingest) => {
                    succeeded += 1;
                    println!("✓ {} ({} chunks)", ingest.path.display(), ingest.chunks);
                }
                Err((file, err)) => {
                    failed += 1;
                    println!("✗ {}: {}", file.display(), err);
                }
            }
        }
        println!("\nIngested {succeeded} file(s), {failed} failed");
    } else {
        let chunks = retriever.add_file(path, std::collections::HashMap::new())?;
        println!("✓ {} ({chunks} chunks)", path.display());
    }

    std::fs::create_dir_all(&config.storage.data_dir).map_err(|e| RagError::Io {
        source: e,
        context: format!(
            "Failed to create data directory {}",
            config.storage.data_dir.display()
        ),
    })?;
    let snapshot = config.snapshot_path();
    retriever.save_snapshot(&snapshot)?;
    tracing::info!(
        "Saved snapshot with {} chunks to {}",
        retriever.chunk_count(),
        snapshot.display()
    );

    Ok(())
}

fn cmd_query(
    config_path: Option<std::path::PathBuf>,
    text: &str,
    top_k: usize,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let snapshot = config.snapshot_path();
    if !snapshot.exists() {
        println!("No ingested documents found. Run `ragpipe ingest <path>` first.");
        return Ok(());
    }

    let chunker = config.build_chunker()?;
    let embedder = Arc::new(FastEmbedProvider::new(&config.embedding.model)?);
    let retriever = Retriever::load_snapshot(&snapshot, chunker, embedder)?;

    let results = retriever.query(text, top_k)?;

    if json {
        let out = serde_json::to_string_pretty(&results).map_err(|e| RagError::Json {
            source: e,
            context: "Failed to serialize query results".to_string(),
        })?;
        println!("{out}");
        return Ok(());
    }

    if results.is_empty() {
        println!("No results");
        return Ok(());
    }

    for (i, chunk) in results.iter().enumerate() {
        println!("{}. [score: {:.4}]", i + 1, chunk.score);
        if let Some(source) = chunk.metadata.get("source") {
            println!("   source: {source}");
        }
        println!("   {}", chunk.text);
        println!();
    }

    Ok(())
}

fn cmd_logs(config_path: Option<std::path::PathBuf>, count: usize) -> Result<()> {
    let config = load_config(config_path)?;
    let logger = QueryLogger::new(&config.logging.log_dir, &config.logging.prefix)?;

    let records = logger.recent(count)?;
    if records.is_empty() {
        println!("No query logs for today");
        return Ok(());
    }

    for record in &records {
        println!("[{}] {}", record.timestamp, record.question);
        println!("  group: {}", record.group_id);
        println!("  answer: {}", record.generated_answer);
        println!("  chunks: {}", record.retrieved_chunks.len());
        println!();
    }

    Ok(())
}

fn cmd_config(config_path: Option<std::path::PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let json = serde_json::to_string_pretty(&config).map_err(|e| RagError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;
            println!("{json}");
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| RagError::Io {
                    source: e,
                    context: format!("Failed to create config directory {}", parent.display()),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
        ConfigAction::Validate { file } => {
            let path = match file {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Chunking strategy: {}", config.chunking.strategy);
            println!("  Embedding model: {}", config.embedding.model);
        }
    }

    Ok(())
}
