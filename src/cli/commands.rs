use anyhow::Context;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::semantic_cache::EntryMetadata;
use crate::infrastructure::logging;
use crate::infrastructure::services::SemanticCacheEngine;

use super::{Cli, Command};

/// Run one CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(prefix) = cli.prefix {
        config.cache.storage_prefix = prefix;
    }

    init_logging(&config);

    let engine = crate::create_engine(&config).await?;
    execute(&engine, cli.command).await
}

fn init_logging(config: &AppConfig) {
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });
}

async fn execute(engine: &SemanticCacheEngine, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Query { prompt } => print_json(&engine.query(&prompt).await?),
        Command::Save {
            prompt,
            response,
            metadata,
        } => {
            let metadata = metadata.as_deref().map(parse_metadata).transpose()?;
            let entry = engine.save(&prompt, &response, metadata).await?;
            print_json(&json!({
                "saved": true,
                "key": entry.key(),
                "timestamp": entry.timestamp(),
            }))
        }
        Command::Stats => print_json(&json!({
            "namespace": engine.namespace(),
            "stats": engine.get_stats().await?,
        })),
        Command::Clear => print_json(&json!({ "removed": engine.clear().await? })),
        Command::Invalidate { prompt } => {
            print_json(&json!({ "removed": engine.invalidate(&prompt).await? }))
        }
        Command::Cleanup => print_json(&json!({ "removed": engine.cleanup_expired().await? })),
        Command::Preload => {
            engine.preload_model().await?;
            info!("Model {} ready", engine.config().model_name);
            print_json(&json!({
                "model": engine.config().model_name,
                "loaded": engine.is_model_loaded(),
            }))
        }
    }
}

fn parse_metadata(raw: &str) -> anyhow::Result<EntryMetadata> {
    serde_json::from_str(raw).context("--metadata must be a JSON object")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
