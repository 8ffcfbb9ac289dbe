//! API integration tests
//!
//! Drives the router end to end: multipart upload, tour lookup and the
//! static image route, against a temporary upload directory.

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use panotour::config::ServerConfig;
use panotour::server::app::create_app;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Create a test server storing tours in a fresh temporary directory
async fn setup_test_server() -> Result<(TestServer, TempDir)> {
    setup_test_server_with(ServerConfig::default()).await
}

async fn setup_test_server_with(config: ServerConfig) -> Result<(TestServer, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = ServerConfig {
        upload_dir: temp_dir.path().join("uploads"),
        ..config
    };

    let app = create_app(&config).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_dir))
}

fn image_form(names: &[&str]) -> MultipartForm {
    names.iter().fold(MultipartForm::new(), |form, name| {
        let part = Part::bytes(format!("pixels of {}", name).into_bytes())
            .file_name(*name)
            .mime_type("image/jpeg");
        form.add_part("images", part)
    })
}

async fn upload(server: &TestServer, names: &[&str]) -> String {
    let response = server.post("/api/upload").multipart(image_form(names)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    body["tourId"].as_str().unwrap().to_string()
}

fn link(node_id: &str, texture_x: u32) -> Value {
    json!({ "nodeId": node_id, "position": { "textureX": texture_x, "textureY": 1800 } })
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "panotour");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "ready");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_health_reports_missing_upload_dir() -> Result<()> {
    let (server, dir) = setup_test_server().await?;

    std::fs::remove_dir_all(dir.path().join("uploads"))?;
    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["storage"], "unavailable");

    Ok(())
}

#[tokio::test]
async fn test_three_image_tour() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let tour_id = upload(&server, &["a.jpg", "b.jpg", "c.jpg"]).await;

    let response = server.get(&format!("/api/tour/{}", tour_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let nodes: Value = response.json();
    assert_eq!(
        nodes,
        json!([
            {
                "id": "1",
                "panorama": format!("/uploads/{}/01_a.jpg", tour_id),
                "name": "Scene 1",
                "links": [link("2", 300)]
            },
            {
                "id": "2",
                "panorama": format!("/uploads/{}/02_b.jpg", tour_id),
                "name": "Scene 2",
                "links": [link("1", 1200), link("3", 300)]
            },
            {
                "id": "3",
                "panorama": format!("/uploads/{}/03_c.jpg", tour_id),
                "name": "Scene 3",
                "links": [link("2", 1200)]
            }
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_single_image_tour_has_no_links() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let tour_id = upload(&server, &["only.jpg"]).await;

    let nodes: Vec<Value> = server.get(&format!("/api/tour/{}", tour_id)).await.json();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["id"], "1");
    assert_eq!(nodes[0]["name"], "Scene 1");
    assert_eq!(nodes[0]["links"], json!([]));

    Ok(())
}

#[tokio::test]
async fn test_node_ids_follow_upload_order() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    for count in [2usize, 5, 20] {
        let names: Vec<String> = (0..count).map(|i| format!("pano-{}.jpg", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let tour_id = upload(&server, &refs).await;

        let nodes: Vec<Value> = server.get(&format!("/api/tour/{}", tour_id)).await.json();
        assert_eq!(nodes.len(), count);

        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node["id"], (i + 1).to_string());
            assert_eq!(
                node["panorama"],
                format!("/uploads/{}/{:02}_pano-{}.jpg", tour_id, i + 1, i)
            );

            let mut expected = Vec::new();
            if i > 0 {
                expected.push(link(&i.to_string(), 1200));
            }
            if i + 1 < count {
                expected.push(link(&(i + 2).to_string(), 300));
            }
            assert_eq!(node["links"], Value::Array(expected));
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_duplicate_names_are_stored_separately() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let tour_id = upload(&server, &["same.jpg", "same.jpg"]).await;

    let first = server.get(&format!("/uploads/{}/01_same.jpg", tour_id)).await;
    let second = server.get(&format!("/uploads/{}/02_same.jpg", tour_id)).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_lookup_is_byte_identical() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let tour_id = upload(&server, &["a.jpg", "b.jpg"]).await;
    let path = format!("/api/tour/{}", tour_id);

    let first = server.get(&path).await.text();
    let second = server.get(&path).await.text();
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn test_unknown_tour_is_not_found() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    for id in ["5f0c1e7a-3b7d-4c39-9a55-0d6f3a1b2c4e", "not-a-uuid"] {
        let response = server.get(&format!("/api/tour/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body, json!({ "error": "Tour not found" }));
    }

    Ok(())
}

#[tokio::test]
async fn test_tour_id_must_match_exactly() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let tour_id = upload(&server, &["a.jpg"]).await;
    let response = server.get(&format!("/api/tour/{}", tour_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let aliases = [
        tour_id.to_uppercase(),
        tour_id.replace('-', ""),
        format!("urn:uuid:{}", tour_id),
    ];
    for alias in aliases {
        let response = server.get(&format!("/api/tour/{}", alias)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{}", alias);

        let body: Value = response.json();
        assert_eq!(body, json!({ "error": "Tour not found" }));
    }

    Ok(())
}

#[tokio::test]
async fn test_uploaded_image_is_served() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let tour_id = upload(&server, &["a.jpg"]).await;

    let response = server.get(&format!("/uploads/{}/01_a.jpg", tour_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "pixels of a.jpg");

    let response = server.get(&format!("/uploads/{}/missing.jpg", tour_id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_upload_without_images_is_rejected() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let form = MultipartForm::new().add_text("caption", "no files here");
    let response = server.post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No images uploaded");

    Ok(())
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let names: Vec<String> = (0..21).map(|i| format!("{}.jpg", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let response = server.post("/api/upload").multipart(image_form(&refs)).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Too many files: at most 20 images per tour");

    Ok(())
}

#[tokio::test]
async fn test_upload_over_body_limit_is_payload_too_large() -> Result<()> {
    let (server, _dir) = setup_test_server_with(ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    })
    .await?;

    let part = Part::bytes(vec![0u8; 4096])
        .file_name("big.jpg")
        .mime_type("image/jpeg");
    let form = MultipartForm::new().add_part("images", part);
    let response = server.post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["error"], "Upload exceeds the maximum request size");

    Ok(())
}

#[tokio::test]
async fn test_corrupt_tour_document() -> Result<()> {
    let (server, dir) = setup_test_server().await?;

    let tour_id = upload(&server, &["a.jpg", "b.jpg"]).await;
    let nodes_path = dir.path().join("uploads").join(&tour_id).join("nodes.json");
    std::fs::write(&nodes_path, r#"[{"id":"7","panorama":"x","name":"Scene 7","links":[]}]"#)?;

    let response = server.get(&format!("/api/tour/{}", tour_id)).await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Tour data is corrupt" }));

    Ok(())
}

#[tokio::test]
async fn test_openapi_document() -> Result<()> {
    let (server, _dir) = setup_test_server().await?;

    let response = server.get("/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let doc: Value = response.json();
    assert!(doc["paths"]["/api/upload"]["post"].is_object());
    assert!(doc["paths"]["/api/tour/{id}"]["get"].is_object());
    assert!(doc["components"]["schemas"]["Node"].is_object());

    Ok(())
}
