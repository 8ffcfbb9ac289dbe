use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;

use super::handlers::{health, tours, upload};
use crate::config::ServerConfig;
use crate::storage::{TourStore, UPLOADS_PREFIX};

#[derive(Clone)]
pub struct AppState {
    pub store: TourStore,
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, upload::upload_images, tours::get_tour),
    components(schemas(
        crate::tour::Node,
        crate::tour::Link,
        crate::tour::Position,
        upload::UploadResponse,
        tours::ErrorResponse
    ))
)]
pub struct ApiDoc;

pub async fn create_app(config: &ServerConfig) -> Result<Router> {
    let store = TourStore::new(&config.upload_dir);
    tokio::fs::create_dir_all(store.root())
        .await
        .with_context(|| format!("creating upload directory {}", store.root().display()))?;

    let cors = match config.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS origin '{}'", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let static_images = ServeDir::new(store.root());
    let state = AppState { store };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api_routes(config.max_upload_bytes))
        .nest_service(UPLOADS_PREFIX, static_images)
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_images).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/tour/:id", get(tours::get_tour))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
