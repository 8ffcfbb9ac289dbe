use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::server::app::AppState;

/// Report liveness and whether the tour store's upload root is usable.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up and the upload directory is available"),
        (status = 503, description = "Upload directory is missing or not a directory")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let root = state.store.root();
    let storage_ready = tokio::fs::metadata(root)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    let (status, label) = if storage_ready {
        (StatusCode::OK, "healthy")
    } else {
        warn!("Upload directory {} is unavailable", root.display());
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "panotour",
            "version": env!("CARGO_PKG_VERSION"),
            "storage": if storage_ready { "ready" } else { "unavailable" }
        })),
    )
}
