//! HTTP gateway for the model catalog.
//!
//! Maps the wire protocol onto [`CatalogService`](mcat_catalog::CatalogService):
//!
//! | Route | Operation |
//! |---|---|
//! | `POST /upload` | register a model from a multipart form |
//! | `GET /models` | list the catalog |
//! | `PUT /models/:filename` | partial metadata update |
//! | `GET /uploads/:filename` | serve the stored binary |
//!
//! Errors render as `{"error": "..."}` with 400, 404 or 500.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;
pub mod upload;

pub use config::{ServerConfig, StorageConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{HealthResponse, ModelResponse};
pub use server::CatalogServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "mcat-test-boundary";

    fn app() -> Router {
        let server = CatalogServer::new(ServerConfig::ephemeral());
        let service = server.build_service().unwrap();
        server.router(service)
    }

    /// Build a multipart body from text fields and an optional file part.
    fn multipart(fields: &[(&str, &str)], file: Option<(&str, &str)>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"model\"; filename=\"{file_name}\"\r\nContent-Type: model/gltf-binary\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(fields: &[(&str, &str)], file: Option<(&str, &str)>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart(fields, file)))
            .unwrap()
    }

    fn put_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send_json(&app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn fresh_catalog_lists_empty_array() {
        let (status, body) = send_json(&app(), get("/models")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn upload_update_and_list_scenario() {
        let app = app();

        let (status, body) = send_json(
            &app,
            upload_request(
                &[("modelName", "chair"), ("position", "[1,0,0]")],
                Some(("chair.glb", "glTF-binary")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "File uploaded successfully");
        let expected = json!({
            "name": "chair",
            "filename": "chair.glb",
            "position": [1.0, 0.0, 0.0],
            "rotation": [0.0, 0.0, 0.0],
            "scale": [1.0, 1.0, 1.0],
            "details": "",
            "price": 0.0
        });
        assert_eq!(body["model"], expected);

        let (status, body) =
            send_json(&app, put_json("/models/chair.glb", json!({ "details": "oak" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Model updated successfully");
        assert_eq!(body["model"]["details"], "oak");
        assert_eq!(body["model"]["position"], json!([1.0, 0.0, 0.0]));

        let (_, list) = send_json(&app, get("/models")).await;
        let mut updated = expected;
        updated["details"] = json!("oak");
        assert_eq!(list, json!([updated]));
    }

    #[tokio::test]
    async fn upload_without_file_is_400() {
        let (status, body) =
            send_json(&app(), upload_request(&[("modelName", "chair")], None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file uploaded.");
    }

    #[tokio::test]
    async fn upload_with_empty_file_is_400() {
        let (status, _) = send_json(
            &app(),
            upload_request(&[("modelName", "chair")], Some(("chair.glb", ""))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_with_malformed_triple_is_400() {
        let app = app();
        let (status, _) = send_json(
            &app,
            upload_request(&[("scale", "[1,1]")], Some(("chair.glb", "glTF"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = send_json(&app, get("/models")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn upload_records_price() {
        let (status, body) = send_json(
            &app(),
            upload_request(
                &[("modelName", "lamp"), ("price", "49.99")],
                Some(("lamp.glb", "glTF")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"]["price"], 49.99);
    }

    #[tokio::test]
    async fn zero_price_update_keeps_prior_price() {
        let app = app();
        send(
            &app,
            upload_request(
                &[("modelName", "lamp"), ("price", "20")],
                Some(("lamp.glb", "glTF")),
            ),
        )
        .await;

        let (status, body) =
            send_json(&app, put_json("/models/lamp.glb", json!({ "price": 0 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"]["price"], 20.0);
    }

    #[tokio::test]
    async fn update_unknown_filename_is_404() {
        let (status, _) = send_json(
            &app(),
            put_json("/models/nonexistent.glb", json!({ "details": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_with_malformed_body_is_400() {
        let app = app();
        send(&app, upload_request(&[("modelName", "chair")], Some(("chair.glb", "glTF")))).await;

        let (status, _) =
            send_json(&app, put_json("/models/chair.glb", json!({ "scale": [1, 2] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method("PUT")
            .uri("/models/chair.glb")
            .body(Body::from("{oops"))
            .unwrap();
        let (status, _) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn asset_is_served_with_type_and_cache_headers() {
        let app = app();
        send(&app, upload_request(&[("modelName", "chair")], Some(("chair.glb", "glTF-bytes")))).await;

        let response = app.clone().oneshot(get("/uploads/chair.glb")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "model/gltf-binary"
        );
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=31536000"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"glTF-bytes");
    }

    #[tokio::test]
    async fn unknown_asset_is_404() {
        let (status, body) = send_json(&app(), get("/uploads/nonexistent.glb")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nonexistent.glb"));
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/models")
            .header(header::ORIGIN, "http://viewer.example")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
