//! Axum route handlers for the generation API.
//!
//! Handlers only parse multipart fields and translate results — all pipeline
//! work lives in `service`.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::generation::service::{self, QuoteRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct BackgroundsResponse {
    pub success: bool,
    pub backgrounds: Vec<String>,
}

impl GenerateResponse {
    fn for_artifact(filename: String) -> Self {
        let download_url = format!("/download/{filename}");
        GenerateResponse {
            success: true,
            filename,
            download_url,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
/// Service info for API discovery.
pub async fn handle_root() -> Json<Value> {
    Json(json!({
        "message": "Poster & Moodboard Generator API",
        "status": "running",
        "endpoints": [
            "/generate-quote-poster",
            "/generate-moodboard",
            "/upload-background"
        ]
    }))
}

/// POST /upload-background
pub async fn handle_upload_background(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let original = field.file_name().unwrap_or("background").to_string();
        let bytes = field.bytes().await?;
        let filename =
            service::upload_background(state.backgrounds.as_ref(), &original, &bytes).await?;
        return Ok(Json(UploadResponse {
            success: true,
            filename,
            message: "Background uploaded successfully".to_string(),
        }));
    }
    Err(AppError::Validation(
        "missing required field 'file'".to_string(),
    ))
}

/// POST /generate-quote-poster
pub async fn handle_generate_quote_poster(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let mut text: Option<String> = None;
    let mut font_size: u32 = 50;
    let mut color = "#FFFFFF".to_string();
    let mut alignment = "center".to_string();
    let mut orientation = "horizontal".to_string();
    let mut background_bytes: Option<Bytes> = None;
    let mut existing_background: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "text" => text = Some(field.text().await?),
            "font_size" => {
                let raw = field.text().await?;
                font_size = raw.trim().parse().map_err(|_| {
                    AppError::Validation(format!(
                        "font_size must be a positive integer, got '{raw}'"
                    ))
                })?;
            }
            "color" => color = field.text().await?,
            "alignment" => alignment = field.text().await?,
            "orientation" => orientation = field.text().await?,
            "background_file" => {
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    background_bytes = Some(bytes);
                }
            }
            "existing_background" => {
                let value = field.text().await?;
                if !value.is_empty() {
                    existing_background = Some(value);
                }
            }
            _ => {}
        }
    }

    let text =
        text.ok_or_else(|| AppError::Validation("missing required field 'text'".to_string()))?;

    let filename = service::generate_quote_poster(
        state.backgrounds.as_ref(),
        state.outputs.as_ref(),
        QuoteRequest {
            text,
            font_size,
            color,
            alignment,
            orientation,
            background_bytes,
            existing_background,
        },
    )
    .await?;

    Ok(Json(GenerateResponse::for_artifact(filename)))
}

/// POST /generate-moodboard
pub async fn handle_generate_moodboard(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let mut layout: Option<String> = None;
    let mut files: Vec<Bytes> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("layout") => layout = Some(field.text().await?),
            Some("files") => files.push(field.bytes().await?),
            _ => {}
        }
    }

    let layout = layout
        .ok_or_else(|| AppError::Validation("missing required field 'layout'".to_string()))?;
    if files.is_empty() {
        return Err(AppError::Validation(
            "missing required field 'files'".to_string(),
        ));
    }

    let filename = service::generate_moodboard(state.outputs.as_ref(), &layout, files).await?;
    Ok(Json(GenerateResponse::for_artifact(filename)))
}

/// GET /download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let bytes = service::download_artifact(state.outputs.as_ref(), &filename).await?;
    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// GET /backgrounds
pub async fn handle_list_backgrounds(
    State(state): State<AppState>,
) -> Result<Json<BackgroundsResponse>, AppError> {
    let backgrounds = state.backgrounds.list().await?;
    Ok(Json(BackgroundsResponse {
        success: true,
        backgrounds,
    }))
}
