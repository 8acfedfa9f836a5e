use std::fmt::Display;

/// Functional slot a garment fills within an outfit
///
/// Derived from the item's category label on demand and never stored, so it
/// can never drift out of sync with an edited category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Top,
    Bottom,
    Shoes,
    Outerwear,
    Unknown,
}

/// Keyword lexicon, v1. Matching is case-insensitive substring lookup,
/// evaluated outerwear-first so "rain jacket" never lands in Top via "top".
const OUTERWEAR_KEYWORDS: &[&str] = &[
    "jacket",
    "coat",
    "blazer",
    "parka",
    "windbreaker",
    "raincoat",
    "overcoat",
    "puffer",
    "anorak",
    "vest",
];

const TOP_KEYWORDS: &[&str] = &[
    "t-shirt",
    "tshirt",
    "tee",
    "shirt",
    "blouse",
    "sweater",
    "hoodie",
    "polo",
    "tank",
    "turtleneck",
    "jumper",
    "cardigan",
    "top",
];

const BOTTOM_KEYWORDS: &[&str] = &[
    "jeans",
    "pants",
    "trousers",
    "shorts",
    "skirt",
    "chinos",
    "leggings",
    "joggers",
    "slacks",
];

const SHOES_KEYWORDS: &[&str] = &[
    "sneaker",
    "shoe",
    "boot",
    "sandal",
    "loafer",
    "heel",
    "trainer",
    "oxford",
    "flat",
];

impl Role {
    /// Derives the role from a free-text category label
    pub fn from_category(category: &str) -> Role {
        let category = category.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|kw| category.contains(kw));

        if matches(OUTERWEAR_KEYWORDS) {
            Role::Outerwear
        } else if matches(SHOES_KEYWORDS) {
            Role::Shoes
        } else if matches(BOTTOM_KEYWORDS) {
            Role::Bottom
        } else if matches(TOP_KEYWORDS) {
            Role::Top
        } else {
            Role::Unknown
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Top => "top",
            Role::Bottom => "bottom",
            Role::Shoes => "shoes",
            Role::Outerwear => "outerwear",
            Role::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
