use super::{Classification, Classifier, Embedder, StylistPick, Stylist, TextRecognizer};
use crate::models::CatalogItem;

/// Classifier used when no on-device model is wired in
///
/// Returns a fixed label with low confidence; the item lands in the catalog
/// with an Unknown role until the user edits its category.
#[derive(Debug, Clone)]
pub struct FallbackClassifier {
    pub label: String,
    pub confidence: u8,
}

impl Default for FallbackClassifier {
    fn default() -> Self {
        Self {
            label: "Clothing Item".to_string(),
            confidence: 25,
        }
    }
}

#[async_trait::async_trait]
impl Classifier for FallbackClassifier {
    async fn classify(&self, _image: &[u8]) -> Classification {
        Classification {
            label: self.label.clone(),
            confidence: self.confidence,
        }
    }
}

/// Text recognizer that never recognizes anything
#[derive(Debug, Clone, Copy)]
pub struct NoopTextRecognizer;

#[async_trait::async_trait]
impl TextRecognizer for NoopTextRecognizer {
    async fn recognize_text(&self, _image: &[u8]) -> Option<String> {
        None
    }
}

/// Embedder that produces no vectors; cohesion simply contributes nothing
#[derive(Debug, Clone, Copy)]
pub struct NoopEmbedder;

#[async_trait::async_trait]
impl Embedder for NoopEmbedder {
    async fn embed(&self, _image: &[u8]) -> Option<Vec<f32>> {
        None
    }
}

/// Stylist with no backing model: declines to pick, explains via template
#[derive(Debug, Clone, Copy)]
pub struct TemplateStylist;

/// Deterministic reason template shared by every stylist fallback path
pub fn template_reason(top_label: &str, bottom_label: &str, occasion: &str) -> String {
    let occasion = occasion.trim();
    if occasion.is_empty() {
        format!("{} and {} pair well together.", top_label, bottom_label)
    } else {
        format!(
            "{} and {} pair well for \"{}\".",
            top_label, bottom_label, occasion
        )
    }
}

#[async_trait::async_trait]
impl Stylist for TemplateStylist {
    async fn pick_outfit(&self, _items: &[CatalogItem], _occasion: &str) -> StylistPick {
        StylistPick::Unavailable
    }

    async fn explain(&self, top_label: &str, bottom_label: &str, occasion: &str) -> String {
        template_reason(top_label, bottom_label, occasion)
    }
}
