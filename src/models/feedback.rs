use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Canonicalized unordered pair of item identifiers
///
/// The lower identifier always comes first so (a, b) and (b, a) collide to
/// one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: Uuid,
    high: Uuid,
}

impl PairKey {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// Like/dislike counters for one item pair; never decremented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStats {
    pub likes: u32,
    pub dislikes: u32,
}

/// Pairwise like/dislike history used to bias future rankings
///
/// Persists as a flat entry list; the in-memory form is a map keyed by the
/// canonical pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "FeedbackEntries", into = "FeedbackEntries")]
pub struct FeedbackStore {
    pairs: HashMap<PairKey, PairStats>,
}

#[derive(Serialize, Deserialize)]
struct FeedbackEntry {
    key: PairKey,
    stats: PairStats,
}

#[derive(Serialize, Deserialize, Default)]
struct FeedbackEntries(Vec<FeedbackEntry>);

impl From<FeedbackEntries> for FeedbackStore {
    fn from(entries: FeedbackEntries) -> Self {
        Self {
            pairs: entries.0.into_iter().map(|e| (e.key, e.stats)).collect(),
        }
    }
}

impl From<FeedbackStore> for FeedbackEntries {
    fn from(store: FeedbackStore) -> Self {
        Self(
            store
                .pairs
                .into_iter()
                .map(|(key, stats)| FeedbackEntry { key, stats })
                .collect(),
        )
    }
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_like(&mut self, a: Uuid, b: Uuid) {
        self.pairs.entry(PairKey::new(a, b)).or_default().likes += 1;
    }

    pub fn record_dislike(&mut self, a: Uuid, b: Uuid) {
        self.pairs.entry(PairKey::new(a, b)).or_default().dislikes += 1;
    }

    /// Laplace-smoothed preference for a pair, in (-0.5, 0.5)
    ///
    /// An unseen pair scores exactly 0; a mostly-liked pair approaches +0.5
    /// and a mostly-disliked pair approaches -0.5.
    pub fn score(&self, a: Uuid, b: Uuid) -> f64 {
        let stats = self
            .pairs
            .get(&PairKey::new(a, b))
            .copied()
            .unwrap_or_default();
        let likes = stats.likes as f64;
        let dislikes = stats.dislikes as f64;
        (likes + 1.0) / (likes + dislikes + 2.0) - 0.5
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
