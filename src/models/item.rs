use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ColorName, Rgb, Role};
use crate::services::embedding;

/// A single garment in the user's catalog
///
/// The image payload is immutable; category, text, color, and embedding may
/// be edited in place. The normalized embedding is maintained alongside the
/// raw vector and always has unit norm (or is absent when the raw vector is
/// absent or zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub added_at: DateTime<Utc>,
    pub image_data: Vec<u8>,
    pub category: String,
    pub text: Option<String>,
    pub color_name: ColorName,
    pub color: Rgb,
    /// Classifier confidence, 0-100
    pub confidence: u8,
    pub embedding: Option<Vec<f32>>,
    pub normalized_embedding: Option<Vec<f32>>,
}

impl CatalogItem {
    pub fn new(
        image_data: Vec<u8>,
        category: String,
        color_name: ColorName,
        color: Rgb,
        text: Option<String>,
        confidence: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            added_at: Utc::now(),
            image_data,
            category,
            text,
            color_name,
            color,
            confidence: confidence.min(100),
            embedding: None,
            normalized_embedding: None,
        }
    }

    /// Functional slot derived from the category label
    pub fn role(&self) -> Role {
        Role::from_category(&self.category)
    }

    /// Attaches a raw feature vector, maintaining the unit-norm invariant
    pub fn set_embedding(&mut self, raw: Option<Vec<f32>>) {
        self.normalized_embedding = raw.as_deref().and_then(embedding::normalize);
        self.embedding = raw;
    }

    /// Display label, e.g. "Black T-shirt"
    pub fn label(&self) -> String {
        format!("{} {}", self.color_name, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item(category: &str) -> CatalogItem {
        CatalogItem::new(
            Vec::new(),
            category.to_string(),
            ColorName::Black,
            Rgb::new(10, 10, 10),
            None,
            90,
        )
    }

    #[test]
    fn test_role_follows_category_edits() {
        let mut item = test_item("T-shirt");
        assert_eq!(item.role(), Role::Top);
        item.category = "Jeans".to_string();
        assert_eq!(item.role(), Role::Bottom);
    }

    #[test]
    fn test_set_embedding_normalizes() {
        let mut item = test_item("T-shirt");
        item.set_embedding(Some(vec![3.0, 4.0]));
        let normalized = item.normalized_embedding.as_ref().unwrap();
        let norm: f32 = normalized.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_zero_embedding_leaves_no_normalized_vector() {
        let mut item = test_item("T-shirt");
        item.set_embedding(Some(vec![0.0, 0.0, 0.0]));
        assert!(item.embedding.is_some());
        assert!(item.normalized_embedding.is_none());
    }

    #[test]
    fn test_clear_embedding() {
        let mut item = test_item("T-shirt");
        item.set_embedding(Some(vec![1.0, 2.0]));
        item.set_embedding(None);
        assert!(item.embedding.is_none());
        assert!(item.normalized_embedding.is_none());
    }

    #[test]
    fn test_confidence_clamped() {
        let item = CatalogItem::new(
            Vec::new(),
            "T-shirt".to_string(),
            ColorName::Red,
            Rgb::new(200, 30, 30),
            None,
            250,
        );
        assert_eq!(item.confidence, 100);
    }

    #[test]
    fn test_label() {
        let item = test_item("T-shirt");
        assert_eq!(item.label(), "Black T-shirt");
    }
}
