use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, RwLock};
use uuid::Uuid;

use crate::config::Config;
use crate::db::{load_or_default, Storage, StorageKey};
use crate::error::{AppError, AppResult};
use crate::models::{
    CatalogItem, ColorName, FeedbackStore, JobStatus, Outfit, ProcessingJob, Rgb,
    SuggestionHistoryEntry,
};
use crate::services::color;
use crate::services::ingestion::{self, IngestionHandle};
use crate::services::providers::Collaborators;
use crate::services::recommend;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notification emitted after a mutation has been persisted
///
/// Slow subscribers may observe `Lagged` and should resync from the
/// snapshot accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WardrobeEvent {
    CatalogChanged,
    JobsChanged,
    FeedbackRecorded,
    HistoryAppended,
}

#[derive(Default)]
struct WardrobeState {
    catalog: Vec<CatalogItem>,
    jobs: Vec<ProcessingJob>,
    feedback: FeedbackStore,
    history: Vec<SuggestionHistoryEntry>,
}

/// The engine's aggregate root: catalog, job queue, feedback, and history
///
/// All four collections live behind one lock and every mutation persists
/// its collection before the lock is released, so observers never see a
/// state that was not also written to storage. Cloning is cheap and shares
/// the same state.
#[derive(Clone)]
pub struct Wardrobe {
    state: Arc<RwLock<WardrobeState>>,
    storage: Arc<dyn Storage>,
    collaborators: Collaborators,
    config: Config,
    events: broadcast::Sender<WardrobeEvent>,
    wake_tx: mpsc::UnboundedSender<()>,
}

impl Wardrobe {
    /// Loads persisted state and starts the ingestion worker
    ///
    /// Jobs found in `processing` are requeued: the worker that claimed
    /// them did not survive, and a queued job is the only honest statement
    /// about their progress. Missing or corrupt collections load as empty
    /// without failing the open.
    pub async fn open(
        storage: Arc<dyn Storage>,
        collaborators: Collaborators,
        config: Config,
    ) -> AppResult<(Self, IngestionHandle)> {
        let catalog: Vec<CatalogItem> = load_or_default(storage.as_ref(), StorageKey::Catalog).await;
        let mut jobs: Vec<ProcessingJob> = load_or_default(storage.as_ref(), StorageKey::Jobs).await;
        let feedback: FeedbackStore = load_or_default(storage.as_ref(), StorageKey::Feedback).await;
        let history: Vec<SuggestionHistoryEntry> =
            load_or_default(storage.as_ref(), StorageKey::History).await;

        let mut interrupted = 0usize;
        for job in &mut jobs {
            if job.status == JobStatus::Processing {
                job.status = JobStatus::Queued;
                interrupted += 1;
            }
        }
        if interrupted > 0 {
            tracing::warn!(interrupted, "Requeued jobs interrupted by a previous shutdown");
        }
        let has_pending = jobs.iter().any(|j| j.status == JobStatus::Queued);

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (wake_tx, wake_rx) = mpsc::unbounded_channel();

        let wardrobe = Self {
            state: Arc::new(RwLock::new(WardrobeState {
                catalog,
                jobs,
                feedback,
                history,
            })),
            storage,
            collaborators,
            config,
            events,
            wake_tx,
        };

        if interrupted > 0 {
            let state = wardrobe.state.read().await;
            wardrobe.persist_collection(StorageKey::Jobs, &state).await?;
        }

        let handle = ingestion::spawn(wardrobe.clone(), wake_rx);
        if has_pending {
            let _ = wardrobe.wake_tx.send(());
        }
        Ok((wardrobe, handle))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Subscribes to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<WardrobeEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the catalog
    pub async fn items(&self) -> Vec<CatalogItem> {
        self.state.read().await.catalog.clone()
    }

    /// Snapshot of the job queue, oldest first
    pub async fn jobs(&self) -> Vec<ProcessingJob> {
        self.state.read().await.jobs.clone()
    }

    /// Snapshot of the suggestion history, most recent first
    pub async fn history(&self) -> Vec<SuggestionHistoryEntry> {
        self.state.read().await.history.clone()
    }

    /// Smoothed preference score for an item pair, in (-0.5, 0.5)
    pub async fn feedback_score(&self, a: Uuid, b: Uuid) -> f64 {
        self.state.read().await.feedback.score(a, b)
    }

    /// Adds an item directly, bypassing the ingestion pipeline
    ///
    /// The dominant color is extracted from the supplied image; an
    /// undecodable or colorless image falls back to mid-gray.
    pub async fn add_item(&self, image_data: Vec<u8>, category: String) -> AppResult<CatalogItem> {
        if category.trim().is_empty() {
            return Err(AppError::InvalidInput("category must not be empty".into()));
        }

        let dominant = image::load_from_memory(&image_data)
            .ok()
            .and_then(|img| color::extract_dominant_color(&img));
        let (item_color, color_name) = match dominant {
            Some(c) => (c, color::classify_color_name(c)),
            None => (Rgb::new(128, 128, 128), ColorName::Gray),
        };

        let item = CatalogItem::new(image_data, category, color_name, item_color, None, 100);

        let mut state = self.state.write().await;
        state.catalog.push(item.clone());
        self.persist_collection(StorageKey::Catalog, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::CatalogChanged);
        Ok(item)
    }

    /// Replaces an item's category label and recognized text
    pub async fn update_item(
        &self,
        id: Uuid,
        category: String,
        text: Option<String>,
    ) -> AppResult<CatalogItem> {
        if category.trim().is_empty() {
            return Err(AppError::InvalidInput("category must not be empty".into()));
        }

        let mut state = self.state.write().await;
        let idx = state
            .catalog
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("item {}", id)))?;
        state.catalog[idx].category = category;
        state.catalog[idx].text = text;
        let updated = state.catalog[idx].clone();
        self.persist_collection(StorageKey::Catalog, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::CatalogChanged);
        Ok(updated)
    }

    /// Removes an item from the catalog
    ///
    /// Feedback entries mentioning the item are kept; they simply stop
    /// mattering once no candidate contains it.
    pub async fn delete_item(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        let before = state.catalog.len();
        state.catalog.retain(|i| i.id != id);
        if state.catalog.len() == before {
            return Err(AppError::NotFound(format!("item {}", id)));
        }
        self.persist_collection(StorageKey::Catalog, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::CatalogChanged);
        Ok(())
    }

    /// Attaches (or clears) an item's raw feature vector
    pub async fn set_item_embedding(&self, id: Uuid, raw: Option<Vec<f32>>) -> AppResult<()> {
        let mut state = self.state.write().await;
        let idx = state
            .catalog
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("item {}", id)))?;
        state.catalog[idx].set_embedding(raw);
        self.persist_collection(StorageKey::Catalog, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::CatalogChanged);
        Ok(())
    }

    /// Records that the user liked seeing `a` and `b` together
    pub async fn record_like(&self, a: Uuid, b: Uuid) -> AppResult<()> {
        self.record_feedback(a, b, true).await
    }

    /// Records that the user disliked seeing `a` and `b` together
    pub async fn record_dislike(&self, a: Uuid, b: Uuid) -> AppResult<()> {
        self.record_feedback(a, b, false).await
    }

    async fn record_feedback(&self, a: Uuid, b: Uuid, liked: bool) -> AppResult<()> {
        if a == b {
            return Err(AppError::InvalidInput(
                "feedback requires two distinct items".into(),
            ));
        }
        let mut state = self.state.write().await;
        if liked {
            state.feedback.record_like(a, b);
        } else {
            state.feedback.record_dislike(a, b);
        }
        self.persist_collection(StorageKey::Feedback, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::FeedbackRecorded);
        Ok(())
    }

    /// Enqueues a captured image for background ingestion
    ///
    /// Returns immediately with the queued job; the worker picks it up in
    /// arrival order.
    pub async fn enqueue_capture(&self, image_data: Vec<u8>) -> AppResult<ProcessingJob> {
        if image_data.is_empty() {
            return Err(AppError::InvalidInput("image payload must not be empty".into()));
        }

        let thumbnail = ingestion::make_thumbnail(&image_data);
        let job = ProcessingJob::new(image_data, thumbnail);

        let mut state = self.state.write().await;
        state.jobs.push(job.clone());
        self.persist_collection(StorageKey::Jobs, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::JobsChanged);
        let _ = self.wake_tx.send(());
        Ok(job)
    }

    /// Cancels a job if it is still queued
    ///
    /// Returns `false` when the job has already been claimed or finished;
    /// in-flight work is never preempted.
    pub async fn cancel_job(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(idx) = state
            .jobs
            .iter()
            .position(|j| j.id == id && j.status == JobStatus::Queued)
        else {
            return Ok(false);
        };
        state.jobs.remove(idx);
        self.persist_collection(StorageKey::Jobs, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::JobsChanged);
        Ok(true)
    }

    /// Removes every done and failed job, returning how many were removed
    pub async fn clear_finished_jobs(&self) -> AppResult<usize> {
        let mut state = self.state.write().await;
        let before = state.jobs.len();
        state.jobs.retain(|j| !j.is_finished());
        let removed = before - state.jobs.len();
        if removed == 0 {
            return Ok(0);
        }
        self.persist_collection(StorageKey::Jobs, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::JobsChanged);
        Ok(removed)
    }

    /// Recommends a single outfit and records it in the history
    ///
    /// Consults the generative stylist first, then the local ranking. The
    /// history keeps the most recent entry at index zero and is capped at
    /// the configured limit.
    pub async fn recommend(
        &self,
        occasion_text: &str,
        seed: Option<u64>,
    ) -> AppResult<Option<Outfit>> {
        let (items, feedback) = {
            let state = self.state.read().await;
            (state.catalog.clone(), state.feedback.clone())
        };

        let outfit = recommend::recommend(
            &items,
            occasion_text,
            &feedback,
            self.collaborators.stylist.as_ref(),
            seed,
        )
        .await;

        if let Some(outfit) = &outfit {
            let mut state = self.state.write().await;
            state
                .history
                .insert(0, SuggestionHistoryEntry::from_outfit(outfit));
            state.history.truncate(self.config.history_limit);
            self.persist_collection(StorageKey::History, &state).await?;
            drop(state);
            self.emit(WardrobeEvent::HistoryAppended);
        }
        Ok(outfit)
    }

    /// Returns ranked outfit candidates without touching the history
    ///
    /// `top_k` defaults to the configured candidate limit.
    pub async fn recommend_candidates(
        &self,
        occasion_text: &str,
        top_k: Option<usize>,
        seed: Option<u64>,
    ) -> Vec<(Outfit, f64)> {
        let (items, feedback) = {
            let state = self.state.read().await;
            (state.catalog.clone(), state.feedback.clone())
        };
        recommend::recommend_candidates(
            &items,
            occasion_text,
            &feedback,
            top_k.unwrap_or(self.config.candidate_limit),
            seed,
        )
    }

    pub(crate) fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Claims the oldest queued job for the worker
    ///
    /// The queued-to-processing transition is persisted before the image
    /// bytes are handed out.
    pub(crate) async fn claim_next_job(&self) -> Option<(Uuid, Vec<u8>)> {
        let mut state = self.state.write().await;
        let idx = state.jobs.iter().position(|j| j.status == JobStatus::Queued)?;
        state.jobs[idx].status = JobStatus::Processing;
        let id = state.jobs[idx].id;
        let image = state.jobs[idx].image_data.clone();
        if let Err(e) = self.persist_collection(StorageKey::Jobs, &state).await {
            tracing::error!(job = %id, error = %e, "Failed to persist job claim");
        }
        drop(state);
        self.emit(WardrobeEvent::JobsChanged);
        tracing::info!(job = %id, "Ingestion job claimed");
        Some((id, image))
    }

    /// Appends an item produced by the ingestion pipeline
    pub(crate) async fn append_ingested_item(&self, item: CatalogItem) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.catalog.push(item);
        self.persist_collection(StorageKey::Catalog, &state).await?;
        drop(state);
        self.emit(WardrobeEvent::CatalogChanged);
        Ok(())
    }

    /// Marks a claimed job done or failed
    pub(crate) async fn complete_job(&self, id: Uuid, result: AppResult<Uuid>) {
        let mut state = self.state.write().await;
        if let Some(idx) = state.jobs.iter().position(|j| j.id == id) {
            match &result {
                Ok(item_id) => {
                    state.jobs[idx].status = JobStatus::Done;
                    state.jobs[idx].error = None;
                    // The payload is in the catalog now; no reason to keep it twice
                    state.jobs[idx].image_data = Vec::new();
                    tracing::info!(job = %id, item = %item_id, "Ingestion job finished");
                }
                Err(e) => {
                    state.jobs[idx].status = JobStatus::Failed;
                    state.jobs[idx].error = Some(e.to_string());
                    tracing::warn!(job = %id, error = %e, "Ingestion job failed");
                }
            }
            if let Err(e) = self.persist_collection(StorageKey::Jobs, &state).await {
                tracing::error!(job = %id, error = %e, "Failed to persist job completion");
            }
        }
        drop(state);
        self.emit(WardrobeEvent::JobsChanged);
    }

    async fn persist_collection(&self, key: StorageKey, state: &WardrobeState) -> AppResult<()> {
        let bytes = match key {
            StorageKey::Catalog => serde_json::to_vec(&state.catalog)?,
            StorageKey::Jobs => serde_json::to_vec(&state.jobs)?,
            StorageKey::Feedback => serde_json::to_vec(&state.feedback)?,
            StorageKey::History => serde_json::to_vec(&state.history)?,
        };
        self.storage.set(key, bytes).await
    }

    fn emit(&self, event: WardrobeEvent) {
        // Send only fails when nobody is listening
        let _ = self.events.send(event);
    }
}
