//! Multipart upload form.
//!
//! Field names follow the admin editor: `model` carries the file,
//! `modelName` the display name, and the transforms arrive as
//! JSON-encoded strings.

use axum::extract::Multipart;
use bytes::Bytes;

use mcat_types::{file_extension, NewModel, Vec3};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Raw multipart fields of an upload request.
#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub model_name: Option<String>,
    pub position: Option<String>,
    pub rotation: Option<String>,
    pub scale: Option<String>,
    pub price: Option<String>,
    pub details: Option<String>,
}

impl UploadForm {
    /// Drain every field of a multipart body. Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart) -> ServerResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "model" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
                "modelName" => form.model_name = Some(field.text().await?),
                "position" => form.position = Some(field.text().await?),
                "rotation" => form.rotation = Some(field.text().await?),
                "scale" => form.scale = Some(field.text().await?),
                "price" => form.price = Some(field.text().await?),
                "details" => form.details = Some(field.text().await?),
                other => tracing::debug!(field = other, "ignoring unknown upload field"),
            }
        }
        Ok(form)
    }

    /// Validate the form and turn it into registration input.
    pub fn into_new_model(self) -> ServerResult<NewModel> {
        let file = self
            .file
            .ok_or_else(|| ServerError::BadRequest("No file uploaded.".into()))?;

        let extension = file
            .file_name
            .as_deref()
            .map(file_extension)
            .unwrap_or_default();
        let mut model = NewModel::new(self.model_name.unwrap_or_default(), extension, file.data);
        model.content_type = file.content_type;
        model.position = parse_triple("position", self.position)?;
        model.rotation = parse_triple("rotation", self.rotation)?;
        model.scale = parse_triple("scale", self.scale)?;
        model.price = parse_price(self.price)?;
        model.details = self.details;
        Ok(model)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_triple(field: &'static str, value: Option<String>) -> ServerResult<Option<Vec3>> {
    present(value)
        .map(|v| Vec3::parse_json(field, &v))
        .transpose()
        .map_err(|e| ServerError::BadRequest(e.to_string()))
}

fn parse_price(value: Option<String>) -> ServerResult<Option<f64>> {
    present(value)
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| ServerError::BadRequest(format!("invalid price: {v}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_file() -> UploadForm {
        UploadForm {
            file: Some(UploadedFile {
                file_name: Some("Chair Final.glb".into()),
                content_type: Some("model/gltf-binary".into()),
                data: Bytes::from_static(b"glTF"),
            }),
            model_name: Some("chair".into()),
            ..UploadForm::default()
        }
    }

    #[test]
    fn missing_file_is_bad_request() {
        let err = UploadForm::default().into_new_model().unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(m) if m == "No file uploaded."));
    }

    #[test]
    fn extension_comes_from_original_file_name() {
        let model = form_with_file().into_new_model().unwrap();
        assert_eq!(model.filename(), "chair.glb");
        assert_eq!(model.content_type.as_deref(), Some("model/gltf-binary"));
    }

    #[test]
    fn blank_transforms_default() {
        let mut form = form_with_file();
        form.position = Some(String::new());
        form.scale = Some("  ".into());
        let record = form.into_new_model().unwrap().to_record();
        assert_eq!(record.position, Vec3::ZERO);
        assert_eq!(record.scale, Vec3::ONE);
    }

    #[test]
    fn transforms_and_price_are_parsed() {
        let mut form = form_with_file();
        form.position = Some("[1,0,0]".into());
        form.rotation = Some("[0, 2.5, 0]".into());
        form.price = Some("12.50".into());
        form.details = Some("oak".into());
        let record = form.into_new_model().unwrap().to_record();
        assert_eq!(record.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(record.rotation, Vec3::new(0.0, 2.5, 0.0));
        assert_eq!(record.price, 12.5);
        assert_eq!(record.details, "oak");
    }

    #[test]
    fn malformed_triple_is_bad_request() {
        let mut form = form_with_file();
        form.rotation = Some("[0, 1]".into());
        assert!(matches!(form.into_new_model(), Err(ServerError::BadRequest(_))));
    }

    #[test]
    fn malformed_price_is_bad_request() {
        let mut form = form_with_file();
        form.price = Some("free".into());
        assert!(matches!(form.into_new_model(), Err(ServerError::BadRequest(_))));
    }

    #[test]
    fn missing_name_uses_placeholder() {
        let mut form = form_with_file();
        form.model_name = None;
        let record = form.into_new_model().unwrap().to_record();
        assert_eq!(record.filename, "unnamedmodel.glb");
    }
}
