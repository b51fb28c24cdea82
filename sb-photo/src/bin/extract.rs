//! sb-photo-extract - EXIF metadata backup
//!
//! Walks the originals directory, reads embedded metadata, and persists
//! the filename-keyed backup file before optimization strips it.

use anyhow::Result;
use sb_common::config::{self, TomlConfig};
use sb_common::store::ArtifactPaths;
use sb_photo::{extract, meta};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting photo metadata extraction (sb-photo-extract) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let toml_config = TomlConfig::load()?;
    let photos_dir = config::resolve_photos_dir(&toml_config);
    let data_dir = config::resolve_data_dir(&toml_config);
    let paths = ArtifactPaths::new(&data_dir);

    let map = extract::extract_dir(&photos_dir);
    meta::save(&paths.photo_metadata(), &map)?;

    info!(photos = map.len(), "Metadata backup written");
    Ok(())
}
