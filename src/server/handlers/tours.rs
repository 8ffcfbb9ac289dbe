use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::errors::TourError;
use crate::server::app::AppState;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Return the stored node document of a tour, byte for byte.
#[utoipa::path(
    get,
    path = "/api/tour/{id}",
    params(
        ("id" = String, Path, description = "Tour ID")
    ),
    responses(
        (status = 200, description = "Tour nodes in scene order", body = [crate::tour::Node]),
        (status = 404, description = "Tour not found", body = ErrorResponse),
        (status = 500, description = "Stored tour is corrupt", body = ErrorResponse)
    )
)]
pub async fn get_tour(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, TourError> {
    let payload = state.store.read_nodes(&id).await?;
    debug!("Serving tour {} ({} bytes)", id, payload.len());

    Ok(([(header::CONTENT_TYPE, "application/json")], payload))
}
