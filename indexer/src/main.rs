use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use search_core::{Engine, EngineConfig, RankingStrategy, SearchResult};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and search a small TF-IDF inverted index", long_about = None)]
struct Cli {
    /// Index directory (defaults to $INDEX_DIR_PATH, then ./_index_data)
    #[arg(long, global = true)]
    index: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every .txt file under a directory
    Create {
        /// Source directory, walked recursively
        path: PathBuf,
    },
    /// Search the index for documents containing every query term
    Search {
        query: String,
        /// Number of results to show
        #[arg(short = 'n', long = "number", default_value_t = 10)]
        number: usize,
        /// Ranking function
        #[arg(long, value_enum, default_value_t = Score::Tfidf)]
        score: Score,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Score {
    Tfidf,
    Bm25,
}

impl From<Score> for RankingStrategy {
    fn from(score: Score) -> Self {
        match score {
            Score::Tfidf => RankingStrategy::TfIdf,
            Score::Bm25 => RankingStrategy::bm25(),
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = match cli.index {
        Some(dir) => EngineConfig::with_index_dir(dir),
        None => EngineConfig::from_env(),
    };

    match cli.command {
        Commands::Create { path } => create_index(config, &path),
        Commands::Search { query, number, score } => {
            let engine = Engine::open(config)?;
            let res = engine.search(&query, number, score.into())?;
            tracing::debug!(query, total_hits = res.total_hits, "search complete");
            println!("{}", format_results(&res.results));
            Ok(())
        }
    }
}

fn create_index(config: EngineConfig, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(&config.index_dir)?;
    let mut engine = Engine::open(config)?;

    let files = fetch_files(dir)?;
    let mut skipped = 0usize;
    for file in &files {
        if let Err(err) = add_file(&mut engine, file) {
            skipped += 1;
            tracing::warn!(file = %file.display(), error = %err, "failed to add file to index");
        }
    }
    tracing::info!(files = files.len(), skipped, num_terms = engine.index().dictionary.len(), "ingested documents");

    engine.flush()?;
    tracing::info!(output = %engine.config().index_dir.display(), "index build complete");
    Ok(())
}

/// All `.txt` files below `dir`, in walk order.
fn fetch_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let p = entry.path();
        if entry.file_type().is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

fn add_file(engine: &mut Engine, file: &Path) -> Result<()> {
    let title = file.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let f = File::open(file)?;
    let doc_id = engine.add_document(&title, f)?;
    tracing::info!(%doc_id, title, "add document to index");
    Ok(())
}

fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "0 match!!".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("rank: {:3}, score: {:4.6}, title: {}", i + 1, r.score, r.title))
        .collect::<Vec<_>>()
        .join("\n")
}
