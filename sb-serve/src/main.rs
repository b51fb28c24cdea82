//! sb-serve - JSON read API server
//!
//! Serves the artifacts the sync and photo pipelines write. Read-only;
//! nothing here mutates the data directory.

use anyhow::Result;
use sb_common::config::{self, TomlConfig};
use sb_common::store::ArtifactPaths;
use sb_serve::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting storybank read API (sb-serve) v{}", env!("CARGO_PKG_VERSION"));

    let toml_config = TomlConfig::load()?;
    let data_dir = config::resolve_data_dir(&toml_config);
    let port = config::resolve_port(&toml_config);
    info!("Data directory: {}", data_dir.display());

    let state = AppState::new(ArtifactPaths::new(&data_dir))?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
