//! Generation pipeline: background resolution, normalization, composition,
//! encoding, and artifact storage.
//!
//! Every request is self-contained — bitmaps live on the request's stack, the
//! only shared resource is the blob store, and output names are unique, so
//! concurrent generations never conflict.

use std::io::Cursor;

use bytes::Bytes;
use image::{imageops, imageops::FilterType, ImageOutputFormat, Rgb, RgbImage};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::{self, layouts};
use crate::storage::BlobStore;

/// Default background when no upload or stored name is supplied.
const DEFAULT_BACKGROUND_SIZE: (u32, u32) = (1200, 800);
const DEFAULT_BACKGROUND_COLOR: Rgb<u8> = Rgb([100, 100, 200]);

/// Backgrounds larger than this are shrunk (aspect-preserving) before text
/// placement. Smaller images are never enlarged.
const MAX_BACKGROUND_SIZE: (u32, u32) = (1920, 1080);

/// Parameters for a quote poster generation request.
pub struct QuoteRequest {
    pub text: String,
    pub font_size: u32,
    pub color: String,
    pub alignment: String,
    pub orientation: String,
    pub background_bytes: Option<Bytes>,
    pub existing_background: Option<String>,
}

/// Persists uploaded background bytes under `{uuid}_{original}` and returns
/// the stored name.
pub async fn upload_background(
    backgrounds: &dyn BlobStore,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    // Browsers may send a full path as the filename; keep the last component.
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("background");
    let stored = format!("{}_{base}", Uuid::new_v4());
    backgrounds.put(&stored, bytes).await?;
    info!("Stored background {stored} ({} bytes)", bytes.len());
    Ok(stored)
}

/// Renders a quote poster and stores it as a PNG artifact, returning the
/// generated name.
pub async fn generate_quote_poster(
    backgrounds: &dyn BlobStore,
    outputs: &dyn BlobStore,
    request: QuoteRequest,
) -> Result<String, AppError> {
    let background = resolve_background(
        backgrounds,
        request.background_bytes.as_deref(),
        request.existing_background.as_deref(),
    )
    .await?;
    let background = fit_within(background, MAX_BACKGROUND_SIZE.0, MAX_BACKGROUND_SIZE.1);

    let color = render::parse_color(&request.color)?;
    let alignment = render::Alignment::parse(&request.alignment);
    let orientation = render::Orientation::parse(&request.orientation);
    let text = request.text;
    let font_size = request.font_size;

    // CPU-bound composition — spawn_blocking keeps the async executor free.
    let poster = tokio::task::spawn_blocking(move || {
        render::draw_quote(background, &text, font_size, color, alignment, orientation)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in quote render: {e}")))?;

    let name = format!("quote_{}.png", Uuid::new_v4());
    outputs.put(&name, &encode_png(&poster)?).await?;
    info!("Generated quote poster {name}");
    Ok(name)
}

/// Renders a moodboard for a named layout and stores it as a PNG artifact.
///
/// The layout is validated before any image bytes are decoded, and images
/// beyond the grid capacity are not decoded at all.
pub async fn generate_moodboard(
    outputs: &dyn BlobStore,
    layout_name: &str,
    files: Vec<Bytes>,
) -> Result<String, AppError> {
    let layout = layouts::lookup(layout_name)?;

    let mut images = Vec::with_capacity(files.len().min(layout.capacity()));
    for bytes in files.iter().take(layout.capacity()) {
        images.push(decode_rgb(bytes)?);
    }

    let board = tokio::task::spawn_blocking(move || render::draw_moodboard(layout, images))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in moodboard render: {e}"))
        })?;

    let name = format!("moodboard_{}.png", Uuid::new_v4());
    outputs.put(&name, &encode_png(&board)?).await?;
    info!("Generated moodboard {name} (layout {layout_name})");
    Ok(name)
}

/// Fetches a generated artifact by name.
pub async fn download_artifact(outputs: &dyn BlobStore, name: &str) -> Result<Vec<u8>, AppError> {
    outputs
        .get(name)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))
}

/// Resolution order for the poster background: uploaded bytes, then a stored
/// background by name, then the solid default canvas.
async fn resolve_background(
    backgrounds: &dyn BlobStore,
    uploaded: Option<&[u8]>,
    existing: Option<&str>,
) -> Result<RgbImage, AppError> {
    if let Some(bytes) = uploaded {
        return decode_rgb(bytes);
    }
    if let Some(name) = existing {
        let bytes = backgrounds
            .get(name)
            .await?
            .ok_or_else(|| AppError::NotFound("Background not found".to_string()))?;
        return decode_rgb(&bytes);
    }
    Ok(RgbImage::from_pixel(
        DEFAULT_BACKGROUND_SIZE.0,
        DEFAULT_BACKGROUND_SIZE.1,
        DEFAULT_BACKGROUND_COLOR,
    ))
}

/// Decodes image bytes and normalizes to 3-channel RGB.
fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, AppError> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// Shrinks `image` to fit within `max_width` x `max_height`, preserving
/// aspect ratio. Images that already fit are returned unchanged — this never
/// enlarges.
fn fit_within(image: RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width <= max_width && height <= max_height {
        return image;
    }
    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let new_width = ((width as f64 * ratio).round() as u32).max(1);
    let new_height = ((height as f64 * ratio).round() as u32).max(1);
    imageops::resize(&image, new_width, new_height, FilterType::Lanczos3)
}

/// Encodes the finished bitmap as PNG in memory. The store write that follows
/// is the first externally visible effect of a generation request.
fn encode_png(image: &RgbImage) -> Result<Vec<u8>, AppError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageOutputFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsStore;

    async fn stores() -> (tempfile::TempDir, FsStore, FsStore) {
        let dir = tempfile::tempdir().unwrap();
        let backgrounds = FsStore::open(dir.path().join("backgrounds")).await.unwrap();
        let outputs = FsStore::open(dir.path().join("outputs")).await.unwrap();
        (dir, backgrounds, outputs)
    }

    fn quote_request(text: &str) -> QuoteRequest {
        QuoteRequest {
            text: text.to_string(),
            font_size: 50,
            color: "#FFFFFF".to_string(),
            alignment: "center".to_string(),
            orientation: "horizontal".to_string(),
            background_bytes: None,
            existing_background: None,
        }
    }

    fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Bytes {
        let image = RgbImage::from_pixel(width, height, Rgb(rgb));
        Bytes::from(encode_png(&image).unwrap())
    }

    #[tokio::test]
    async fn test_quote_poster_default_background_end_to_end() {
        let (_dir, backgrounds, outputs) = stores().await;
        let name = generate_quote_poster(&backgrounds, &outputs, quote_request("Hello World"))
            .await
            .unwrap();
        assert!(name.starts_with("quote_") && name.ends_with(".png"));

        // Immediately retrievable by the returned name, at the default size.
        let bytes = download_artifact(&outputs, &name).await.unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 800));
    }

    #[tokio::test]
    async fn test_quote_poster_vertical_swaps_default_canvas() {
        let (_dir, backgrounds, outputs) = stores().await;
        let mut request = quote_request("Hello");
        request.orientation = "vertical".to_string();
        let name = generate_quote_poster(&backgrounds, &outputs, request)
            .await
            .unwrap();
        let bytes = download_artifact(&outputs, &name).await.unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 1200));
    }

    #[tokio::test]
    async fn test_quote_poster_unknown_stored_background_is_not_found() {
        let (_dir, backgrounds, outputs) = stores().await;
        let mut request = quote_request("Hello");
        request.existing_background = Some("missing.png".to_string());
        let err = generate_quote_poster(&backgrounds, &outputs, request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_quote_poster_bad_color_is_render_error() {
        let (_dir, backgrounds, outputs) = stores().await;
        let mut request = quote_request("Hello");
        request.color = "chartreuse-ish".to_string();
        let err = generate_quote_poster(&backgrounds, &outputs, request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
    }

    #[tokio::test]
    async fn test_quote_poster_uses_uploaded_background() {
        let (_dir, backgrounds, outputs) = stores().await;
        let mut request = quote_request("Hi");
        request.background_bytes = Some(png_bytes(640, 480, [9, 9, 9]));
        let name = generate_quote_poster(&backgrounds, &outputs, request)
            .await
            .unwrap();
        let bytes = download_artifact(&outputs, &name).await.unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        // Fits within 1920x1080 already, so dimensions are untouched.
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[tokio::test]
    async fn test_upload_then_generate_from_stored_background() {
        let (_dir, backgrounds, outputs) = stores().await;
        let stored = upload_background(&backgrounds, "beach.png", &png_bytes(320, 240, [0, 80, 160]))
            .await
            .unwrap();
        assert!(stored.ends_with("_beach.png"));
        assert_eq!(backgrounds.list().await.unwrap(), vec![stored.clone()]);

        let mut request = quote_request("Sea");
        request.existing_background = Some(stored);
        generate_quote_poster(&backgrounds, &outputs, request)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_strips_path_components() {
        let (_dir, backgrounds, _outputs) = stores().await;
        let stored = upload_background(&backgrounds, "C:\\photos\\sunset.png", b"bytes")
            .await
            .unwrap();
        assert!(stored.ends_with("_sunset.png"));
        assert!(!stored.contains('\\'));
    }

    #[tokio::test]
    async fn test_moodboard_end_to_end() {
        let (_dir, _backgrounds, outputs) = stores().await;
        let files = vec![png_bytes(50, 50, [200, 0, 0]), png_bytes(80, 40, [0, 200, 0])];
        let name = generate_moodboard(&outputs, "4x4", files).await.unwrap();
        assert!(name.starts_with("moodboard_") && name.ends_with(".png"));

        let bytes = download_artifact(&outputs, &name).await.unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1920, 1920));
    }

    #[tokio::test]
    async fn test_moodboard_unknown_layout_fails_before_decode() {
        let (_dir, _backgrounds, outputs) = stores().await;
        // Garbage bytes: if decoding happened first this would be a Render
        // error, but the layout check must win.
        let files = vec![Bytes::from_static(b"not an image")];
        let err = generate_moodboard(&outputs, "9-grid", files)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(outputs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_moodboard_unreadable_image_is_render_error() {
        let (_dir, _backgrounds, outputs) = stores().await;
        let err = generate_moodboard(&outputs, "4x4", vec![Bytes::from_static(b"junk")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
        // No partial artifact is left behind.
        assert!(outputs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_missing_artifact_is_not_found() {
        let (_dir, _backgrounds, outputs) = stores().await;
        let err = download_artifact(&outputs, "quote_nope.png").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_fit_within_shrinks_preserving_aspect() {
        let image = RgbImage::new(3840, 2160);
        let fitted = fit_within(image, 1920, 1080);
        assert_eq!(fitted.dimensions(), (1920, 1080));

        let wide = RgbImage::new(4000, 1000);
        let fitted = fit_within(wide, 1920, 1080);
        assert_eq!(fitted.dimensions(), (1920, 480));
    }

    #[test]
    fn test_fit_within_never_enlarges() {
        let image = RgbImage::new(800, 600);
        let fitted = fit_within(image, 1920, 1080);
        assert_eq!(fitted.dimensions(), (800, 600));
    }
}
