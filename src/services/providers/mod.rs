//! External collaborator abstractions.
//!
//! The engine never talks to a model directly; classification, text
//! recognition, embedding generation, and the optional generative stylist
//! all sit behind these traits. Every trait is total: implementations
//! degrade to fixed fallback values instead of failing, so collaborator
//! unavailability is never a hard error.

use std::sync::Arc;

use crate::models::{CatalogItem, Outfit};

pub mod fallback;

pub use fallback::{FallbackClassifier, NoopEmbedder, NoopTextRecognizer, TemplateStylist};

/// Result of classifying a garment photo
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    /// 0-100
    pub confidence: u8,
}

/// Outcome of asking the generative stylist for a full outfit
///
/// Callers branch on this explicitly; there is no silent fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub enum StylistPick {
    Picked(Outfit),
    Unavailable,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies a garment image into a category label with confidence
    ///
    /// Must return a fixed fallback classification when no model is
    /// available.
    async fn classify(&self, image: &[u8]) -> Classification;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognizes printed text (logo/brand) in a garment image
    async fn recognize_text(&self, image: &[u8]) -> Option<String>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Generates a feature vector for a garment image
    ///
    /// Vector length is implementation-defined but must be consistent
    /// across items for cosine similarity to be meaningful.
    async fn embed(&self, image: &[u8]) -> Option<Vec<f32>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Stylist: Send + Sync {
    /// Asks a generative model to pick a full outfit
    async fn pick_outfit(&self, items: &[CatalogItem], occasion: &str) -> StylistPick;

    /// Produces a one-line reason for a top/bottom pairing
    ///
    /// Must fall back to a deterministic template when no model backs it.
    async fn explain(&self, top_label: &str, bottom_label: &str, occasion: &str) -> String;
}

/// Bundle of collaborator handles passed to the engine
///
/// Defaults to the graceful-degradation implementations, so an engine
/// without any backing models still ingests and recommends.
#[derive(Clone)]
pub struct Collaborators {
    pub classifier: Arc<dyn Classifier>,
    pub text_recognizer: Arc<dyn TextRecognizer>,
    pub embedder: Arc<dyn Embedder>,
    pub stylist: Arc<dyn Stylist>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            classifier: Arc::new(FallbackClassifier::default()),
            text_recognizer: Arc::new(NoopTextRecognizer),
            embedder: Arc::new(NoopEmbedder),
            stylist: Arc::new(TemplateStylist),
        }
    }
}
