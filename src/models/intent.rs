use serde::{Deserialize, Serialize};

/// Occasion inferred from free-text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occasion {
    Casual,
    Work,
    Formal,
    Sport,
    Unknown,
}

/// Temperature tier inferred from free-text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Temperature {
    Cold,
    Cool,
    Mild,
    Warm,
    Hot,
    Unknown,
}

/// Weather conditions; several may apply at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Rainy,
    Windy,
    Snowy,
    Humid,
    Sunny,
}

/// Structured signals parsed from an occasion/weather description
///
/// Built fresh per recommendation request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitIntent {
    pub occasion: Occasion,
    pub temperature: Temperature,
    pub conditions: Vec<Condition>,
}

impl OutfitIntent {
    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }
}

impl Default for OutfitIntent {
    fn default() -> Self {
        Self {
            occasion: Occasion::Unknown,
            temperature: Temperature::Unknown,
            conditions: Vec::new(),
        }
    }
}
