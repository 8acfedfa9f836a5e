use crate::models::{CatalogItem, FeedbackStore, Outfit, Role};
use crate::services::intent::parse_intent;
use crate::services::providers::{Stylist, StylistPick};
use crate::services::scoring::{combo_score, JitterRng};

/// Seed used when the caller does not supply one
pub const DEFAULT_SEED: u64 = 0;

/// Items partitioned by derived role; unknown-role items are excluded
struct RoleGroups<'a> {
    tops: Vec<&'a CatalogItem>,
    bottoms: Vec<&'a CatalogItem>,
    outerwear: Vec<&'a CatalogItem>,
    shoes: Vec<&'a CatalogItem>,
}

fn partition_by_role(items: &[CatalogItem]) -> RoleGroups<'_> {
    let mut groups = RoleGroups {
        tops: Vec::new(),
        bottoms: Vec::new(),
        outerwear: Vec::new(),
        shoes: Vec::new(),
    };
    for item in items {
        match item.role() {
            Role::Top => groups.tops.push(item),
            Role::Bottom => groups.bottoms.push(item),
            Role::Outerwear => groups.outerwear.push(item),
            Role::Shoes => groups.shoes.push(item),
            Role::Unknown => {}
        }
    }
    groups
}

fn best_by_score<'a>(
    candidates: &[&'a CatalogItem],
    mut score_fn: impl FnMut(&CatalogItem) -> f64,
) -> Option<&'a CatalogItem> {
    candidates
        .iter()
        .copied()
        .max_by(|a, b| {
            score_fn(a)
                .partial_cmp(&score_fn(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Produces ranked outfit candidates for an occasion description
///
/// For every (top, bottom) pair the outerwear and shoes slots are filled by
/// a two-stage greedy pass: best outerwear with shoes absent, then best
/// shoes given that outerwear. This is an approximation of the full 4-way
/// search that keeps cost at O(tops x bottoms x (outers + shoes)); exact
/// ties in the final score are broken by a small seeded jitter so a fixed
/// seed reproduces its ordering exactly.
///
/// Returns an empty list when the catalog has no tops or no bottoms; an
/// outfit requires at minimum one of each.
pub fn recommend_candidates(
    items: &[CatalogItem],
    occasion_text: &str,
    feedback: &FeedbackStore,
    top_k: usize,
    seed: Option<u64>,
) -> Vec<(Outfit, f64)> {
    let intent = parse_intent(occasion_text);
    let groups = partition_by_role(items);

    if groups.tops.is_empty() || groups.bottoms.is_empty() {
        return Vec::new();
    }

    let mut rng = JitterRng::new(seed.unwrap_or(DEFAULT_SEED));
    let mut candidates = Vec::with_capacity(groups.tops.len() * groups.bottoms.len());

    for &top in &groups.tops {
        for &bottom in &groups.bottoms {
            let outer = best_by_score(&groups.outerwear, |o| {
                combo_score(top, bottom, Some(o), None, &intent, feedback)
            });
            let shoes = best_by_score(&groups.shoes, |s| {
                combo_score(top, bottom, outer, Some(s), &intent, feedback)
            });

            let score =
                combo_score(top, bottom, outer, shoes, &intent, feedback) + rng.jitter();

            let outfit = Outfit {
                top: Some(top.clone()),
                bottom: Some(bottom.clone()),
                outerwear: outer.cloned(),
                shoes: shoes.cloned(),
                reason: String::new(),
            };
            candidates.push((outfit, score));
        }
    }

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(top_k.max(1));
    candidates
}

/// Recommends a single outfit, consulting the generative stylist first
///
/// When the stylist declines or is unavailable the top-ranked candidate is
/// used, with the reason synthesized through the stylist's explain path
/// (a deterministic template when no model backs it). Returns `None` when
/// no candidate can be produced.
pub async fn recommend(
    items: &[CatalogItem],
    occasion_text: &str,
    feedback: &FeedbackStore,
    stylist: &dyn Stylist,
    seed: Option<u64>,
) -> Option<Outfit> {
    match stylist.pick_outfit(items, occasion_text).await {
        StylistPick::Picked(outfit) => Some(outfit),
        StylistPick::Unavailable => {
            let mut ranked = recommend_candidates(items, occasion_text, feedback, 1, seed);
            if ranked.is_empty() {
                tracing::info!(occasion = %occasion_text, "No viable outfit candidates");
                return None;
            }
            let (mut outfit, score) = ranked.remove(0);
            tracing::debug!(score, "Stylist unavailable, using top-ranked candidate");

            let top_label = outfit.top.as_ref().map(|i| i.label()).unwrap_or_default();
            let bottom_label = outfit
                .bottom
                .as_ref()
                .map(|i| i.label())
                .unwrap_or_default();
            outfit.reason = stylist
                .explain(&top_label, &bottom_label, occasion_text)
                .await;
            Some(outfit)
        }
    }
}
