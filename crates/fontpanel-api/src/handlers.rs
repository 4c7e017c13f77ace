//! Request handlers for the `/api` routes and the health probe.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use fontpanel_core::{AppState, ConfigProvider, FontEntry, NewFont};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Reply for successful mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    pub message: String,
}

impl StatusReply {
    fn success(message: &str) -> Json<Self> {
        Json(Self {
            status: "success".to_string(),
            message: message.to_string(),
        })
    }
}

/// Body of `POST /api/delete-font`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFontPayload {
    pub font_family: String,
    pub file_name: String,
}

/// Body of `POST /api/edit-font`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFontPayload {
    pub old_font_family: String,
    pub new_font_family: String,
    pub file_name: String,
}

/// Reply of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
    pub project: String,
    pub version: String,
}

/// `GET /health`
pub async fn health<C: ConfigProvider>(State(state): State<AppState<C>>) -> Json<HealthReply> {
    Json(HealthReply {
        status: "ok".to_string(),
        project: state.project_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/list-fonts`
pub async fn list_fonts<C: ConfigProvider>(
    State(state): State<AppState<C>>,
) -> Result<Json<Vec<FontEntry>>, ApiError> {
    Ok(Json(state.store().list().await?))
}

#[derive(Default)]
struct UploadForm {
    file_name: Option<String>,
    bytes: Option<Bytes>,
    family: Option<String>,
    weight: Option<String>,
    style: Option<String>,
}

impl UploadForm {
    fn into_font(self) -> Result<(NewFont, Bytes), ApiError> {
        fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
            value.ok_or_else(|| ApiError::bad_request(format!("Missing form field '{field}'.")))
        }

        let bytes = self
            .bytes
            .ok_or_else(|| ApiError::bad_request("Missing form field 'font_file'."))?;
        let file_name = required(self.file_name, "font_file")?;
        let font = NewFont::parse(
            &required(self.family, "font_family")?,
            &required(self.weight, "font_weight")?,
            &required(self.style, "font_style")?,
            &file_name,
        )?;
        Ok((font, bytes))
    }
}

/// Browsers may send a full client path; keep the last component only.
fn client_basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// `POST /api/upload-font` (multipart)
pub async fn upload_font<C: ConfigProvider>(
    State(state): State<AppState<C>>,
    mut multipart: Multipart,
) -> Result<Json<StatusReply>, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "font_file" => {
                form.file_name = field.file_name().map(|n| client_basename(n).to_string());
                form.bytes = Some(field.bytes().await?);
            }
            "font_family" => form.family = Some(field.text().await?),
            "font_weight" => form.weight = Some(field.text().await?),
            "font_style" => form.style = Some(field.text().await?),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    let (font, bytes) = form.into_font()?;
    state.store().upload(&font, &bytes).await?;
    Ok(StatusReply::success("Font uploaded."))
}

/// `POST /api/delete-font`
pub async fn delete_font<C: ConfigProvider>(
    State(state): State<AppState<C>>,
    payload: Result<Json<DeleteFontPayload>, JsonRejection>,
) -> Result<Json<StatusReply>, ApiError> {
    let Json(payload) = payload?;
    state
        .store()
        .delete(&payload.font_family, &payload.file_name)
        .await?;
    Ok(StatusReply::success("Font deleted."))
}

/// `POST /api/edit-font`
pub async fn edit_font<C: ConfigProvider>(
    State(state): State<AppState<C>>,
    payload: Result<Json<EditFontPayload>, JsonRejection>,
) -> Result<Json<StatusReply>, ApiError> {
    let Json(payload) = payload?;
    state
        .store()
        .rename(
            &payload.old_font_family,
            &payload.new_font_family,
            &payload.file_name,
        )
        .await?;
    Ok(StatusReply::success("Font alias updated."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_basename() {
        assert_eq!(client_basename("C:\\fonts\\hand.ttf"), "hand.ttf");
        assert_eq!(client_basename("dir/hand.ttf"), "hand.ttf");
        assert_eq!(client_basename("hand.ttf"), "hand.ttf");
    }

    #[test]
    fn test_payload_field_names() {
        let payload: EditFontPayload = serde_json::from_str(
            r#"{"oldFontFamily":"A","newFontFamily":"B","fileName":"a.ttf"}"#,
        )
        .unwrap();
        assert_eq!(payload.old_font_family, "A");
        assert_eq!(payload.new_font_family, "B");
        assert_eq!(payload.file_name, "a.ttf");
    }

    #[test]
    fn test_upload_form_missing_fields() {
        let err = UploadForm::default().into_font().unwrap_err();
        assert_eq!(err.detail(), "Missing form field 'font_file'.");

        let form = UploadForm {
            file_name: Some("a.ttf".into()),
            bytes: Some(Bytes::from_static(b"x")),
            family: Some("A".into()),
            weight: None,
            style: Some("normal".into()),
        };
        assert_eq!(
            form.into_font().unwrap_err().detail(),
            "Missing form field 'font_weight'."
        );
    }
}
