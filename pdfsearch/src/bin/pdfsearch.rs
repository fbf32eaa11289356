//! pdfsearch CLI
//!
//! Runs one search against SerpApi and prints every event as a JSON line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use pdfsearch::prelude::*;
use pdfsearch::observability::{init_logging, LogConfig, LogFormat};

/// pdfsearch - find retrievable PDF documents
#[derive(Parser, Debug)]
#[command(name = "pdfsearch", version, about = "Search the web for PDF documents")]
struct Cli {
    /// JSON configuration file; defaults apply to missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log encoding (text or json)
    #[arg(long, default_value = "text")]
    log_format: LogFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for PDFs and stream results
    Search {
        /// Search term
        query: String,

        /// Language code (all, pt-BR, pt-PT, en, es)
        #[arg(short, long)]
        language: Option<String>,

        /// Override the number of provider pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Report process and cache status
    Health,
}

/// Writes each event to stdout as `{"event": ..., "payload": ...}`.
struct JsonLinesChannel;

impl JsonLinesChannel {
    fn print(event: &SearchEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "Failed to encode event"),
        }
    }
}

#[async_trait]
impl DeliveryChannel for JsonLinesChannel {
    async fn emit(&self, event: SearchEvent) {
        Self::print(&event);
    }

    fn try_emit(&self, event: SearchEvent) {
        Self::print(&event);
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::from_env());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut config = AppConfig::from_json_str(&text)?;
    if !config.serpapi.has_credential() {
        config.serpapi.api_key = SerpApiConfig::from_env().api_key;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::default()
        .with_format(cli.log_format)
        .with_default_filter(if cli.verbose { "debug" } else { "warn" });
    init_logging(&log_config)?;

    let mut config = load_config(cli.config.as_ref())?;
    let store: Arc<dyn CacheStore> = Arc::new(InMemoryCacheStore::new());
    store.connect().await?;

    match cli.command {
        Command::Search {
            query,
            language,
            max_pages,
        } => {
            if let Some(max_pages) = max_pages {
                config.search = config.search.with_max_pages(max_pages);
            }

            let fetcher = Arc::new(SerpApiFetcher::new(config.serpapi.clone())?);
            let probe = Arc::new(HttpLinkProbe::new(&config.probe)?);
            let cache = ResultCache::from_config(Arc::clone(&store), &config.search);
            let service = PdfSearchService::new(
                fetcher,
                LinkValidator::new(probe),
                cache,
                config.search.clone(),
            );

            let handler = SearchHandler::new(Arc::new(service));
            let results = handler
                .on_search_pdfs(&query, language.as_deref(), Arc::new(JsonLinesChannel))
                .await;

            store.close().await?;
            results?;
        }
        Command::Health => {
            let health = HealthStatus::check(store.as_ref()).await;
            println!("{}", serde_json::to_string(&health)?);
            store.close().await?;
        }
    }

    Ok(())
}
