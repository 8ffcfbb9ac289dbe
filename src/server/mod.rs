pub mod app;
pub mod handlers;

use anyhow::Result;
use tracing::info;

use crate::config::ServerConfig;

pub async fn start_server(config: &ServerConfig) -> Result<()> {
    let app = app::create_app(config).await?;

    log_routes(config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes(config: &ServerConfig) {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /api-docs/openapi.json      - OpenAPI document");
    info!("  /api/upload                 - Upload panoramas (POST, multipart field 'images')");
    info!("  /api/tour/:id               - Tour nodes");
    info!(
        "  /uploads/:id/:filename      - Stored images (from {})",
        config.upload_dir.display()
    );
}
