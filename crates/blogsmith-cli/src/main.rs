//! Blogsmith CLI - content-generation orchestration pipeline
//!
//! Usage:
//!   blogsmith init                      Write a default blogsmith.toml
//!   blogsmith generate --topic <TOPIC>  Generate an article and persist it

use anyhow::{Context, Result};
use blogsmith_core::{PipelineConfig, RawContentRequest};
use blogsmith_gateway::ModelGateway;
use blogsmith_pipeline::{generate_content, GenerateReport};
use blogsmith_storage::HttpObjectStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(author, version, about = "Content-generation orchestration pipeline")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an article and persist it to the configured object store
    Generate {
        /// Article topic
        #[arg(long)]
        topic: String,

        /// Brand name used for voice and framing
        #[arg(long)]
        brand: Option<String>,

        /// Target audience
        #[arg(long)]
        audience: Option<String>,

        /// Tone (professional, conversational, authoritative, playful, technical)
        #[arg(long)]
        tone: Option<String>,

        /// SEO keyword to guarantee coverage for (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Target word count
        #[arg(long)]
        words: Option<usize>,

        /// Overall request deadline in seconds
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Directory containing blogsmith.toml (defaults to cwd)
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,
    },

    /// Write a default blogsmith.toml
    Init {
        /// Target directory (defaults to cwd)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Generate {
            topic,
            brand,
            audience,
            tone,
            keywords,
            words,
            deadline_secs,
            config_dir,
        } => {
            let config = PipelineConfig::load_or_default(&config_dir)
                .context("Failed to load configuration")?;

            let gateway = ModelGateway::from_config(&config);
            let store = Arc::new(HttpObjectStore::new(config.storage_target.clone()));

            let payload = RawContentRequest {
                topic: Some(topic),
                brand,
                audience,
                tone,
                seo_keywords: keywords,
                target_word_count: words,
            };
            let deadline = deadline_secs.map(Duration::from_secs);

            let report = generate_content(payload, &config, gateway, store, deadline).await;
            println!("{}", serde_json::to_string_pretty(&report)?);

            if matches!(report, GenerateReport::Error { .. }) {
                std::process::exit(1);
            }
        }

        Commands::Init { path } => {
            PipelineConfig::write_default(&path).context("Failed to write configuration")?;
            println!("Wrote {}", path.join("blogsmith.toml").display());
        }
    }

    Ok(())
}
