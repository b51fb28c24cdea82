//! sb-photo-optimize - Web-size re-encoding
//!
//! Resizes and re-encodes every original into the optimized directory.
//! Run extraction first: re-encoding strips embedded metadata.

use anyhow::Result;
use sb_common::config::{self, TomlConfig};
use sb_photo::optimize;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting photo optimization (sb-photo-optimize) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let toml_config = TomlConfig::load()?;
    let photos_dir = config::resolve_photos_dir(&toml_config);
    let optimized_dir = config::resolve_optimized_dir(&toml_config);

    let stats = optimize::optimize_dir(&photos_dir, &optimized_dir)?;
    info!(
        optimized = stats.optimized,
        skipped = stats.skipped,
        failed = stats.failed,
        "Optimization complete"
    );
    Ok(())
}
