//! sb-ingest - Airtable to JSON sync
//!
//! Pulls all story and person tables, applies the consent policy, and
//! writes the derived JSON artifacts the site consumes. Standalone batch
//! binary, no flags; credentials come from the environment or the config
//! file.

use anyhow::Result;
use sb_common::config::{self, TomlConfig};
use sb_common::store::ArtifactPaths;
use sb_ingest::airtable::AirtableClient;
use sb_ingest::pipeline;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting storybank sync (sb-ingest) v{}", env!("CARGO_PKG_VERSION"));

    let toml_config = TomlConfig::load()?;
    let credentials = config::resolve_credentials(&toml_config)?;
    let data_dir = config::resolve_data_dir(&toml_config);
    info!("Data directory: {}", data_dir.display());

    let client = AirtableClient::new(&credentials)?;
    let paths = ArtifactPaths::new(&data_dir);
    let summary = pipeline::run(&client, &paths).await?;

    info!(
        exported = summary.stories_exported,
        dropped = summary.stories_dropped,
        people = summary.people,
        media_downloaded = summary.media.downloaded,
        media_failed = summary.media.failed,
        "Sync complete"
    );
    Ok(())
}
