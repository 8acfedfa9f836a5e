use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use wardrobe_engine::db::{MemoryStorage, Storage, StorageKey};
use wardrobe_engine::models::{ColorName, JobStatus, ProcessingJob};
use wardrobe_engine::services::providers::{
    Classification, Classifier, Collaborators, Embedder,
};
use wardrobe_engine::{Config, Wardrobe};

struct StubClassifier {
    label: &'static str,
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _image: &[u8]) -> Classification {
        Classification {
            label: self.label.to_string(),
            confidence: 92,
        }
    }
}

struct StubEmbedder;

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, _image: &[u8]) -> Option<Vec<f32>> {
        Some(vec![3.0, 4.0])
    }
}

fn stub_collaborators(label: &'static str) -> Collaborators {
    Collaborators {
        classifier: Arc::new(StubClassifier { label }),
        embedder: Arc::new(StubEmbedder),
        ..Collaborators::default()
    }
}

fn sample_png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(pixel)));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

async fn wait_for_finished_jobs(wardrobe: &Wardrobe, count: usize) -> Vec<ProcessingJob> {
    for _ in 0..500 {
        let jobs = wardrobe.jobs().await;
        if jobs.iter().filter(|j| j.is_finished()).count() >= count {
            return jobs;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("ingestion did not finish in time");
}

#[tokio::test]
async fn test_ingest_end_to_end() {
    let storage = Arc::new(MemoryStorage::new());
    let (wardrobe, worker) = Wardrobe::open(
        storage,
        stub_collaborators("T-shirt"),
        Config::default(),
    )
    .await
    .unwrap();

    let job = wardrobe
        .enqueue_capture(sample_png(200, 200, [200, 30, 30, 255]))
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Queued);
    assert!(!job.thumbnail.is_empty());

    let jobs = wait_for_finished_jobs(&wardrobe, 1).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, JobStatus::Done);
    assert!(jobs[0].error.is_none());

    let items = wardrobe.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].category, "T-shirt");
    assert_eq!(items[0].confidence, 92);
    assert_eq!(items[0].color_name, ColorName::Red);
    assert!(!items[0].image_data.is_empty());

    let normalized = items[0].normalized_embedding.as_ref().unwrap();
    let norm: f32 = normalized.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-6);

    worker.shutdown().await;
}

#[tokio::test]
async fn test_undecodable_capture_fails_without_blocking_queue() {
    let storage = Arc::new(MemoryStorage::new());
    let (wardrobe, worker) = Wardrobe::open(
        storage,
        stub_collaborators("Jacket"),
        Config::default(),
    )
    .await
    .unwrap();

    wardrobe.enqueue_capture(vec![9u8; 64]).await.unwrap();
    wardrobe
        .enqueue_capture(sample_png(100, 100, [20, 20, 20, 255]))
        .await
        .unwrap();

    let jobs = wait_for_finished_jobs(&wardrobe, 2).await;
    assert_eq!(jobs[0].status, JobStatus::Failed);
    assert!(jobs[0].error.is_some());
    assert_eq!(jobs[1].status, JobStatus::Done);

    // The bad capture produced no item, the good one did
    assert_eq!(wardrobe.items().await.len(), 1);

    worker.shutdown().await;
}

#[tokio::test]
async fn test_interrupted_job_is_requeued_and_processed() {
    let storage = Arc::new(MemoryStorage::new());

    // Simulate a crash that left a claimed job behind
    let mut stale = ProcessingJob::new(sample_png(80, 80, [40, 60, 150, 255]), Vec::new());
    stale.status = JobStatus::Processing;
    storage
        .set(StorageKey::Jobs, serde_json::to_vec(&vec![stale]).unwrap())
        .await
        .unwrap();

    let (wardrobe, worker) = Wardrobe::open(
        storage,
        stub_collaborators("Jeans"),
        Config::default(),
    )
    .await
    .unwrap();

    let jobs = wait_for_finished_jobs(&wardrobe, 1).await;
    assert_eq!(jobs[0].status, JobStatus::Done);
    assert_eq!(wardrobe.items().await.len(), 1);
    assert_eq!(wardrobe.items().await[0].category, "Jeans");

    worker.shutdown().await;
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let storage = MemoryStorage::new();

    let (wardrobe, worker) = Wardrobe::open(
        Arc::new(storage.clone()),
        stub_collaborators("T-shirt"),
        Config::default(),
    )
    .await
    .unwrap();

    wardrobe
        .enqueue_capture(sample_png(120, 120, [200, 30, 30, 255]))
        .await
        .unwrap();
    wait_for_finished_jobs(&wardrobe, 1).await;

    let jeans = wardrobe
        .add_item(Vec::new(), "Jeans".to_string())
        .await
        .unwrap();
    let tee_id = wardrobe
        .items()
        .await
        .iter()
        .find(|i| i.category == "T-shirt")
        .unwrap()
        .id;
    wardrobe.record_like(tee_id, jeans.id).await.unwrap();
    worker.shutdown().await;

    let (reopened, worker) = Wardrobe::open(
        Arc::new(storage),
        Collaborators::default(),
        Config::default(),
    )
    .await
    .unwrap();

    assert_eq!(reopened.items().await.len(), 2);
    assert!(reopened.feedback_score(jeans.id, tee_id).await > 0.0);
    assert_eq!(reopened.jobs().await[0].status, JobStatus::Done);

    worker.shutdown().await;
}

#[tokio::test]
async fn test_history_is_capped() {
    let config = Config {
        history_limit: 3,
        ..Config::default()
    };
    let (wardrobe, worker) = Wardrobe::open(
        Arc::new(MemoryStorage::new()),
        Collaborators::default(),
        config,
    )
    .await
    .unwrap();

    wardrobe
        .add_item(Vec::new(), "T-shirt".to_string())
        .await
        .unwrap();
    wardrobe
        .add_item(Vec::new(), "Jeans".to_string())
        .await
        .unwrap();

    for _ in 0..5 {
        assert!(wardrobe.recommend("casual", None).await.unwrap().is_some());
    }
    let history = wardrobe.history().await;
    assert_eq!(history.len(), 3);
    assert!(history[0].suggested_at >= history[2].suggested_at);

    worker.shutdown().await;
}

#[tokio::test]
async fn test_clear_finished_jobs_keeps_pending_work() {
    let (wardrobe, worker) = Wardrobe::open(
        Arc::new(MemoryStorage::new()),
        Collaborators::default(),
        Config::default(),
    )
    .await
    .unwrap();

    wardrobe.enqueue_capture(vec![7u8; 16]).await.unwrap();
    wait_for_finished_jobs(&wardrobe, 1).await;

    // With the worker gone the second job stays queued
    worker.shutdown().await;
    let pending = wardrobe.enqueue_capture(vec![8u8; 16]).await.unwrap();

    assert_eq!(wardrobe.clear_finished_jobs().await.unwrap(), 1);
    let jobs = wardrobe.jobs().await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, pending.id);
    assert_eq!(jobs[0].status, JobStatus::Queued);
    assert_eq!(wardrobe.clear_finished_jobs().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ingested_items_feed_recommendations() {
    let (wardrobe, worker) = Wardrobe::open(
        Arc::new(MemoryStorage::new()),
        stub_collaborators("T-shirt"),
        Config::default(),
    )
    .await
    .unwrap();

    wardrobe
        .enqueue_capture(sample_png(150, 150, [200, 30, 30, 255]))
        .await
        .unwrap();
    wait_for_finished_jobs(&wardrobe, 1).await;
    wardrobe
        .add_item(Vec::new(), "Blue Jeans".to_string())
        .await
        .unwrap();

    let outfit = wardrobe
        .recommend("casual lunch", Some(42))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outfit.top.as_ref().unwrap().category, "T-shirt");
    assert!(outfit.reason.contains("Red T-shirt"));

    let candidates = wardrobe
        .recommend_candidates("casual lunch", None, Some(42))
        .await;
    assert_eq!(candidates.len(), 1);

    worker.shutdown().await;
}

#[tokio::test]
async fn test_feedback_reorders_candidates() {
    let (wardrobe, worker) = Wardrobe::open(
        Arc::new(MemoryStorage::new()),
        Collaborators::default(),
        Config::default(),
    )
    .await
    .unwrap();

    let tee = wardrobe
        .add_item(Vec::new(), "T-shirt".to_string())
        .await
        .unwrap();
    let hoodie = wardrobe
        .add_item(Vec::new(), "Hoodie".to_string())
        .await
        .unwrap();
    let jeans = wardrobe
        .add_item(Vec::new(), "Jeans".to_string())
        .await
        .unwrap();

    for _ in 0..10 {
        wardrobe.record_dislike(tee.id, jeans.id).await.unwrap();
        wardrobe.record_like(hoodie.id, jeans.id).await.unwrap();
    }

    let ranked = wardrobe
        .recommend_candidates("weekend", Some(2), Some(3))
        .await;
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].0.top.as_ref().unwrap().id, hoodie.id);

    worker.shutdown().await;
}
