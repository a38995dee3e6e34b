use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use mcat_types::{ModelPatch, ModelRecord};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use crate::upload::UploadForm;

/// Body of successful upload and update responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelResponse {
    pub message: String,
    pub model: ModelRecord,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `POST /upload`
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Json<ModelResponse>> {
    let model = UploadForm::read(multipart).await?.into_new_model()?;
    let record = state.service.register_model(model).await?;
    Ok(Json(ModelResponse {
        message: "File uploaded successfully".into(),
        model: record,
    }))
}

/// `GET /models`
pub async fn list_models_handler(
    State(state): State<AppState>,
) -> ServerResult<Json<Vec<ModelRecord>>> {
    Ok(Json(state.service.list_models().await?))
}

/// `PUT /models/:filename`
///
/// The body is parsed by hand so malformed JSON maps to 400 like every other
/// input error. An empty body is an empty patch.
pub async fn update_model_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    body: Bytes,
) -> ServerResult<Json<ModelResponse>> {
    let patch: ModelPatch = if body.iter().all(u8::is_ascii_whitespace) {
        ModelPatch::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ServerError::BadRequest(format!("invalid update body: {e}")))?
    };
    let record = state.service.apply_patch(&filename, patch).await?;
    Ok(Json(ModelResponse {
        message: "Model updated successfully".into(),
        model: record,
    }))
}

/// `GET /uploads/:filename`
pub async fn asset_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ServerResult<Response> {
    let asset = state.service.fetch_asset(&filename).await?;
    let cache_control = format!("public, max-age={}", state.cache_max_age_secs);
    Ok((
        [
            (header::CONTENT_TYPE, asset.content_type),
            (header::CACHE_CONTROL, cache_control),
        ],
        asset.data,
    )
        .into_response())
}
