use crate::models::{
    CatalogItem, Condition, FeedbackStore, Occasion, OutfitIntent, Temperature,
};
use crate::services::embedding;

// Term weights, v1. The top/bottom pair dominates every term; outerwear and
// shoes contribute progressively less.
const HARMONY_W_TOP_BOTTOM: f64 = 1.0;
const HARMONY_W_OUTER: f64 = 0.4;
const HARMONY_W_SHOES: f64 = 0.3;
const COHESION_W: f64 = 1.0;
const OCCASION_W_CORE: f64 = 1.0;
const OCCASION_W_OUTER: f64 = 0.6;
const OCCASION_W_SHOES: f64 = 0.5;
const WEATHER_W_CORE: f64 = 1.0;
const WEATHER_W_OUTER: f64 = 0.5;
const WEATHER_W_SHOES: f64 = 0.4;
const FEEDBACK_W_TOP_BOTTOM: f64 = 0.8;
const FEEDBACK_W_CORE_OUTER: f64 = 0.4;
const FEEDBACK_W_CORE_SHOES: f64 = 0.3;
const FEEDBACK_W_OUTER_SHOES: f64 = 0.2;

// Harmony buckets over circular hue distance (degrees)
const HARMONY_MATCHING: f64 = 0.9;
const HARMONY_TRIADIC: f64 = 0.7;
const HARMONY_COMPLEMENTARY: f64 = 0.6;
const HARMONY_CLASHING: f64 = 0.4;
const HARMONY_BOTH_NEUTRAL: f64 = 0.5;
const HARMONY_ONE_NEUTRAL: f64 = 1.0;

// Occasion-fit tiers
const FIT_STRONG: f64 = 0.95;
const FIT_NEUTRAL: f64 = 0.6;
const FIT_POOR: f64 = 0.2;

const FORMAL_STRONG: &[&str] = &[
    "blazer", "suit", "dress shirt", "oxford", "loafer", "heel", "trousers", "slacks", "gown",
];
const FORMAL_POOR: &[&str] = &[
    "hoodie", "sneaker", "shorts", "jogger", "tank", "t-shirt", "tee",
];
const WORK_STRONG: &[&str] = &[
    "blazer", "shirt", "blouse", "chinos", "trousers", "slacks", "loafer", "cardigan", "polo",
];
const WORK_POOR: &[&str] = &["tank", "shorts", "jogger", "sweatpants"];
const SPORT_STRONG: &[&str] = &[
    "tank", "t-shirt", "tee", "shorts", "jogger", "legging", "sneaker", "trainer", "hoodie",
];
const SPORT_POOR: &[&str] = &["blazer", "loafer", "heel", "oxford", "gown", "suit"];
const CASUAL_STRONG: &[&str] = &[
    "t-shirt", "tee", "jeans", "sneaker", "hoodie", "shorts", "polo", "denim",
];
const CASUAL_POOR: &[&str] = &["gown", "tuxedo", "suit"];

// Weather adjustments: each table applies at most once per item
const COLD_FRIENDLY: (&[&str], f64) = (
    &[
        "sweater", "hoodie", "coat", "parka", "puffer", "boot", "turtleneck", "flannel", "wool",
        "thermal", "jeans",
    ],
    0.4,
);
const COLD_HOSTILE: (&[&str], f64) = (&["shorts", "tank", "sandal", "skirt", "linen"], -0.5);
const COOL_FRIENDLY: (&[&str], f64) = (
    &["sweater", "hoodie", "jacket", "jeans", "cardigan", "boot"],
    0.25,
);
const COOL_HOSTILE: (&[&str], f64) = (&["shorts", "tank", "sandal"], -0.3);
const MILD_FRIENDLY: (&[&str], f64) = (&["t-shirt", "tee", "jeans", "chinos"], 0.1);
const WARM_FRIENDLY: (&[&str], f64) = (
    &["t-shirt", "tee", "shorts", "skirt", "linen", "polo"],
    0.3,
);
const WARM_HOSTILE: (&[&str], f64) = (
    &["coat", "parka", "sweater", "wool", "puffer", "turtleneck"],
    -0.4,
);
const HOT_FRIENDLY: (&[&str], f64) = (&["tank", "shorts", "sandal", "linen", "tee"], 0.4);
const HOT_HOSTILE: (&[&str], f64) = (
    &[
        "sweater", "hoodie", "jacket", "coat", "parka", "wool", "puffer", "boot",
    ],
    -0.5,
);
const RAINY_FRIENDLY: (&[&str], f64) = (&["raincoat", "rain", "waterproof", "boot"], 0.35);
const RAINY_HOSTILE: (&[&str], f64) = (&["suede", "canvas", "sandal"], -0.3);
const WINDY_FRIENDLY: (&[&str], f64) = (&["windbreaker", "jacket", "coat"], 0.25);
const WINDY_HOSTILE: (&[&str], f64) = (&["skirt", "dress"], -0.2);
const SNOWY_FRIENDLY: (&[&str], f64) = (&["boot", "parka", "coat", "wool", "puffer"], 0.35);
const SNOWY_HOSTILE: (&[&str], f64) = (&["sneaker", "sandal", "canvas", "mesh"], -0.35);
const HUMID_FRIENDLY: (&[&str], f64) = (&["linen", "cotton", "tank", "shorts"], 0.2);
const HUMID_HOSTILE: (&[&str], f64) = (&["leather", "wool", "puffer"], -0.25);
const SUNNY_FRIENDLY: (&[&str], f64) = (&["cap", "t-shirt", "tee", "shorts"], 0.15);

/// Jitter amplitude added to final candidate scores for tie-breaking
pub const JITTER_AMPLITUDE: f64 = 0.01;

/// Deterministic xorshift64* generator used for score jitter
///
/// The jitter exists purely to break exact ties: same seed, same ordering;
/// different seeds shuffle effectively-tied candidates.
#[derive(Debug, Clone)]
pub struct JitterRng {
    state: u64,
}

impl JitterRng {
    const MIX: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        let state = seed ^ Self::MIX;
        // xorshift never leaves the zero state
        Self {
            state: if state == 0 { Self::MIX } else { state },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in ±JITTER_AMPLITUDE
    pub fn jitter(&mut self) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * JITTER_AMPLITUDE
    }
}

fn category_matches(item: &CatalogItem, keywords: &[&str]) -> bool {
    let category = item.category.to_lowercase();
    keywords.iter().any(|kw| category.contains(kw))
}

/// Color compatibility of two items, in [0.4, 1.0]
///
/// A neutral color anchors anything; two neutrals are merely safe. Two
/// chromatic colors bucket by circular hue distance: matching (~0 deg),
/// triadic (~120 deg), complementary (~180 deg), else clashing.
pub fn harmony_score(a: &CatalogItem, b: &CatalogItem) -> f64 {
    let a_neutral = a.color_name.is_neutral();
    let b_neutral = b.color_name.is_neutral();

    if a_neutral && b_neutral {
        return HARMONY_BOTH_NEUTRAL;
    }
    if a_neutral || b_neutral {
        return HARMONY_ONE_NEUTRAL;
    }

    let raw = (a.color.hue() - b.color.hue()).abs() as f64;
    let distance = raw.min(360.0 - raw);

    if distance < 30.0 {
        HARMONY_MATCHING
    } else if (distance - 120.0).abs() <= 30.0 {
        HARMONY_TRIADIC
    } else if distance > 150.0 {
        HARMONY_COMPLEMENTARY
    } else {
        HARMONY_CLASHING
    }
}

/// How well one item suits the occasion, in {0.2, 0.6, 0.95}
pub fn occasion_fit(item: &CatalogItem, occasion: Occasion) -> f64 {
    let (strong, poor): (&[&str], &[&str]) = match occasion {
        Occasion::Formal => (FORMAL_STRONG, FORMAL_POOR),
        Occasion::Work => (WORK_STRONG, WORK_POOR),
        Occasion::Sport => (SPORT_STRONG, SPORT_POOR),
        Occasion::Casual => (CASUAL_STRONG, CASUAL_POOR),
        Occasion::Unknown => return FIT_NEUTRAL,
    };

    if category_matches(item, strong) {
        FIT_STRONG
    } else if category_matches(item, poor) {
        FIT_POOR
    } else {
        FIT_NEUTRAL
    }
}

fn apply_adjustment(item: &CatalogItem, table: (&[&str], f64)) -> f64 {
    if category_matches(item, table.0) {
        table.1
    } else {
        0.0
    }
}

/// Additive weather suitability of one item given the parsed intent
///
/// Positive adjustments for season/condition-appropriate garments, negative
/// for mismatches; an item untouched by every table scores 0.
pub fn weather_fit(item: &CatalogItem, intent: &OutfitIntent) -> f64 {
    let mut fit = 0.0;

    match intent.temperature {
        Temperature::Cold => {
            fit += apply_adjustment(item, COLD_FRIENDLY);
            fit += apply_adjustment(item, COLD_HOSTILE);
        }
        Temperature::Cool => {
            fit += apply_adjustment(item, COOL_FRIENDLY);
            fit += apply_adjustment(item, COOL_HOSTILE);
        }
        Temperature::Mild => {
            fit += apply_adjustment(item, MILD_FRIENDLY);
        }
        Temperature::Warm => {
            fit += apply_adjustment(item, WARM_FRIENDLY);
            fit += apply_adjustment(item, WARM_HOSTILE);
        }
        Temperature::Hot => {
            fit += apply_adjustment(item, HOT_FRIENDLY);
            fit += apply_adjustment(item, HOT_HOSTILE);
        }
        Temperature::Unknown => {}
    }

    for condition in &intent.conditions {
        match condition {
            Condition::Rainy => {
                fit += apply_adjustment(item, RAINY_FRIENDLY);
                fit += apply_adjustment(item, RAINY_HOSTILE);
            }
            Condition::Windy => {
                fit += apply_adjustment(item, WINDY_FRIENDLY);
                fit += apply_adjustment(item, WINDY_HOSTILE);
            }
            Condition::Snowy => {
                fit += apply_adjustment(item, SNOWY_FRIENDLY);
                fit += apply_adjustment(item, SNOWY_HOSTILE);
            }
            Condition::Humid => {
                fit += apply_adjustment(item, HUMID_FRIENDLY);
                fit += apply_adjustment(item, HUMID_HOSTILE);
            }
            Condition::Sunny => {
                fit += apply_adjustment(item, SUNNY_FRIENDLY);
            }
        }
    }

    fit
}

/// Scores a candidate combination as the additive sum of five terms:
/// color harmony, embedding cohesion, occasion fit, weather fit, and
/// pairwise feedback bias
pub fn combo_score(
    top: &CatalogItem,
    bottom: &CatalogItem,
    outerwear: Option<&CatalogItem>,
    shoes: Option<&CatalogItem>,
    intent: &OutfitIntent,
    feedback: &FeedbackStore,
) -> f64 {
    let mut score = 0.0;

    // Color harmony over the five slot pairs
    score += HARMONY_W_TOP_BOTTOM * harmony_score(top, bottom);
    if let Some(outer) = outerwear {
        score += HARMONY_W_OUTER * (harmony_score(outer, top) + harmony_score(outer, bottom));
    }
    if let Some(shoe) = shoes {
        score += HARMONY_W_SHOES * (harmony_score(shoe, top) + harmony_score(shoe, bottom));
    }

    // Embedding cohesion: average similarity over pairs where both sides
    // carry an embedding; zero contribution when none do
    let mut pairs: Vec<(&CatalogItem, &CatalogItem)> = vec![(top, bottom)];
    if let Some(outer) = outerwear {
        pairs.push((outer, top));
        pairs.push((outer, bottom));
    }
    if let Some(shoe) = shoes {
        pairs.push((shoe, top));
        pairs.push((shoe, bottom));
    }
    let embedded: Vec<f64> = pairs
        .iter()
        .filter(|(a, b)| a.normalized_embedding.is_some() && b.normalized_embedding.is_some())
        .map(|(a, b)| embedding::item_similarity(a, b) as f64)
        .collect();
    if !embedded.is_empty() {
        score += COHESION_W * embedded.iter().sum::<f64>() / embedded.len() as f64;
    }

    // Occasion fit per item
    score += OCCASION_W_CORE * occasion_fit(top, intent.occasion);
    score += OCCASION_W_CORE * occasion_fit(bottom, intent.occasion);
    if let Some(outer) = outerwear {
        score += OCCASION_W_OUTER * occasion_fit(outer, intent.occasion);
    }
    if let Some(shoe) = shoes {
        score += OCCASION_W_SHOES * occasion_fit(shoe, intent.occasion);
    }

    // Weather fit per item
    score += WEATHER_W_CORE * weather_fit(top, intent);
    score += WEATHER_W_CORE * weather_fit(bottom, intent);
    if let Some(outer) = outerwear {
        score += WEATHER_W_OUTER * weather_fit(outer, intent);
    }
    if let Some(shoe) = shoes {
        score += WEATHER_W_SHOES * weather_fit(shoe, intent);
    }

    // Feedback bias over every pairwise combination of present slots
    score += FEEDBACK_W_TOP_BOTTOM * feedback.score(top.id, bottom.id);
    if let Some(outer) = outerwear {
        score += FEEDBACK_W_CORE_OUTER
            * (feedback.score(top.id, outer.id) + feedback.score(bottom.id, outer.id));
    }
    if let Some(shoe) = shoes {
        score += FEEDBACK_W_CORE_SHOES
            * (feedback.score(top.id, shoe.id) + feedback.score(bottom.id, shoe.id));
    }
    if let (Some(outer), Some(shoe)) = (outerwear, shoes) {
        score += FEEDBACK_W_OUTER_SHOES * feedback.score(outer.id, shoe.id);
    }

    score
}
