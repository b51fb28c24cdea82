//! sb-photo-reindex - Gallery index build
//!
//! Joins the metadata backup against the optimized directory and writes
//! `photo-index.json`, sorted newest first.

use anyhow::Result;
use sb_common::config::{self, TomlConfig};
use sb_common::store::{self, ArtifactPaths};
use sb_photo::{meta, reindex};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting photo index build (sb-photo-reindex) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let toml_config = TomlConfig::load()?;
    let optimized_dir = config::resolve_optimized_dir(&toml_config);
    let data_dir = config::resolve_data_dir(&toml_config);
    let paths = ArtifactPaths::new(&data_dir);

    let map = meta::load(&paths.photo_metadata())?;
    let records = reindex::build_index(&map, &optimized_dir)?;
    store::write_json(&paths.photo_index(), &records)?;

    info!(records = records.len(), "Photo index written");
    Ok(())
}
