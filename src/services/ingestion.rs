use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, ColorName, Rgb};
use crate::services::color;
use crate::wardrobe::Wardrobe;

/// Captured images are downscaled to this edge length before analysis and
/// storage; full-resolution photos are never kept.
pub const INGEST_MAX_DIMENSION: u32 = 512;

/// Edge length of the preview thumbnail attached to each job
pub const THUMBNAIL_MAX_DIMENSION: u32 = 96;

/// Handle to the background ingestion worker
///
/// Dropping the handle leaves the worker running; call [`shutdown`] for a
/// clean stop. The worker finishes the job it is draining before exiting.
///
/// [`shutdown`]: IngestionHandle::shutdown
pub struct IngestionHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl IngestionHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.join.await;
    }
}

/// Spawns the single ingestion worker for a wardrobe
///
/// Jobs are processed strictly one at a time in arrival order. The worker
/// sleeps until woken through `wake_rx` and drains every queued job before
/// sleeping again.
pub(crate) fn spawn(wardrobe: Wardrobe, mut wake_rx: mpsc::UnboundedReceiver<()>) -> IngestionHandle {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let join = tokio::spawn(async move {
        tracing::debug!("Ingestion worker started");
        loop {
            tokio::select! {
                wake = wake_rx.recv() => match wake {
                    Some(()) => drain(&wardrobe).await,
                    None => break,
                },
                _ = shutdown_rx.recv() => break,
            }
        }
        tracing::debug!("Ingestion worker stopped");
    });

    IngestionHandle { shutdown_tx, join }
}

async fn drain(wardrobe: &Wardrobe) {
    while let Some((job_id, image)) = wardrobe.claim_next_job().await {
        let result = process(wardrobe, &image).await;
        wardrobe.complete_job(job_id, result).await;
    }
}

/// Runs the full analysis pipeline for one captured image
///
/// The item is appended to the catalog as soon as classification, color,
/// and text recognition complete; the embedding attaches afterwards so a
/// slow embedder never delays the item becoming visible.
async fn process(wardrobe: &Wardrobe, image_bytes: &[u8]) -> AppResult<Uuid> {
    let decoded = image::load_from_memory(image_bytes)?;
    let scaled = downscale(decoded);
    let stored = encode_png(&scaled)?;

    let collaborators = wardrobe.collaborators();
    let classification = collaborators.classifier.classify(&stored).await;

    let (item_color, color_name) = match color::extract_dominant_color(&scaled) {
        Some(c) => (c, color::classify_color_name(c)),
        None => (Rgb::new(128, 128, 128), ColorName::Gray),
    };

    let text = collaborators.text_recognizer.recognize_text(&stored).await;

    let item = CatalogItem::new(
        stored.clone(),
        classification.label,
        color_name,
        item_color,
        text,
        classification.confidence,
    );
    let item_id = item.id;
    wardrobe.append_ingested_item(item).await?;

    let raw = collaborators.embedder.embed(&stored).await;
    if raw.is_some() {
        match wardrobe.set_item_embedding(item_id, raw).await {
            // The user deleted the item while the embedder was running
            Err(AppError::NotFound(_)) => {}
            other => other?,
        }
    }

    Ok(item_id)
}

fn downscale(img: DynamicImage) -> DynamicImage {
    if img.width().max(img.height()) > INGEST_MAX_DIMENSION {
        img.thumbnail(INGEST_MAX_DIMENSION, INGEST_MAX_DIMENSION)
    } else {
        img
    }
}

fn encode_png(img: &DynamicImage) -> AppResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Builds the preview thumbnail for a freshly enqueued capture
///
/// Returns empty bytes for an undecodable payload; the job itself will fail
/// with a proper error once the worker reaches it.
pub(crate) fn make_thumbnail(image_bytes: &[u8]) -> Vec<u8> {
    image::load_from_memory(image_bytes)
        .ok()
        .map(|img| img.thumbnail(THUMBNAIL_MAX_DIMENSION, THUMBNAIL_MAX_DIMENSION))
        .and_then(|img| encode_png(&img).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample_png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(pixel));
        encode_png(&DynamicImage::ImageRgba8(img)).unwrap()
    }

    #[test]
    fn test_downscale_caps_largest_edge() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2048,
            1024,
            Rgba([200, 30, 30, 255]),
        ));
        let scaled = downscale(img);
        assert_eq!(scaled.width().max(scaled.height()), INGEST_MAX_DIMENSION);
    }

    #[test]
    fn test_downscale_leaves_small_images_alone() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 48, Rgba([0, 0, 0, 255])));
        let scaled = downscale(img);
        assert_eq!((scaled.width(), scaled.height()), (64, 48));
    }

    #[test]
    fn test_make_thumbnail_round_trips() {
        let bytes = sample_png(400, 300, [30, 60, 200, 255]);
        let thumb = make_thumbnail(&bytes);
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert!(decoded.width() <= THUMBNAIL_MAX_DIMENSION);
        assert!(decoded.height() <= THUMBNAIL_MAX_DIMENSION);
    }

    #[test]
    fn test_make_thumbnail_tolerates_garbage() {
        assert!(make_thumbnail(b"definitely not an image").is_empty());
    }
}
