use crate::models::CatalogItem;

/// Divides a vector by its Euclidean norm
///
/// Returns `None` for empty and zero vectors, which have no direction.
pub fn normalize(vector: &[f32]) -> Option<Vec<f32>> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    Some(vector.iter().map(|x| x / norm).collect())
}

/// Dot product of two equal-length vectors
///
/// Returns 0 when the lengths differ or either vector is empty, so mixed
/// embedding generations degrade to "no signal" instead of garbage.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Learned-similarity proxy between two catalog items, in [0, 1]
///
/// Uses the pre-normalized embeddings; items without one contribute 0.
pub fn item_similarity(a: &CatalogItem, b: &CatalogItem) -> f32 {
    match (&a.normalized_embedding, &b.normalized_embedding) {
        (Some(va), Some(vb)) => (cosine_similarity(va, vb) + 1.0) / 2.0,
        _ => 0.0,
    }
}
