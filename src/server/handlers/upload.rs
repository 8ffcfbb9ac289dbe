use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::MAX_IMAGES_PER_TOUR;
use crate::errors::TourError;
use crate::server::app::AppState;
use crate::tour::build_tour;

/// Multipart field carrying the panorama files.
pub const IMAGES_FIELD: &str = "images";

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub tour_id: String,
}

/// Store a batch of panoramas and build a tour from them in upload order.
///
/// Expects `multipart/form-data` with up to 20 files under the `images` field.
#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Tour created", body = UploadResponse),
        (status = 400, description = "No images, too many images or malformed body", body = crate::server::handlers::tours::ErrorResponse),
        (status = 413, description = "Upload exceeds the configured body limit", body = crate::server::handlers::tours::ErrorResponse)
    )
)]
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, TourError> {
    // One id per request, fixed before any file is touched.
    let tour_id = Uuid::new_v4();
    let store = &state.store;
    let mut panoramas: Vec<String> = Vec::new();
    let mut dir_created = false;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(TourError::from)?
    {
        if field.name() != Some(IMAGES_FIELD) || field.file_name().is_none() {
            continue;
        }
        if panoramas.len() == MAX_IMAGES_PER_TOUR {
            return Err(TourError::TooManyFiles {
                max: MAX_IMAGES_PER_TOUR,
            });
        }
        if !dir_created {
            store.create_tour_dir(&tour_id).await?;
            dir_created = true;
        }

        let index = panoramas.len() + 1;
        let original_name = field.file_name().map(str::to_string);
        let mut image = store
            .create_image(&tour_id, index, original_name.as_deref())
            .await?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(TourError::from)?
        {
            image.write_chunk(&chunk).await?;
        }
        let (url, size) = image.finish().await?;
        debug!("Stored {} ({} bytes)", url, size);
        panoramas.push(url);
    }

    if panoramas.is_empty() {
        return Err(TourError::NoImages);
    }

    let nodes = build_tour(&panoramas);
    store.write_nodes(&tour_id, &nodes).await?;
    info!("Created tour {} with {} scenes", tour_id, nodes.len());

    Ok(Json(UploadResponse {
        tour_id: tour_id.to_string(),
    }))
}
