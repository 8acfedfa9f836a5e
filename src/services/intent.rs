use crate::models::{Condition, Occasion, OutfitIntent, Temperature};

// Keyword tables, v1. First match wins per field; conditions union freely.

const FORMAL_KEYWORDS: &[&str] = &[
    "formal", "wedding", "interview", "gala", "ceremony", "black tie", "funeral",
];
const WORK_KEYWORDS: &[&str] = &["work", "office", "meeting", "business", "presentation"];
const SPORT_KEYWORDS: &[&str] = &[
    "gym", "sport", "workout", "run", "jog", "hike", "training", "exercise",
];

/// Extreme-cold cues checked before the generic cold tier so "snow" never
/// downgrades to merely cool
const COLD_KEYWORDS: &[&str] = &["freezing", "snow", "frigid", "icy", "blizzard"];
const COOL_KEYWORDS: &[&str] = &["cold", "chilly", "cool", "brisk", "crisp"];
const WARM_KEYWORDS: &[&str] = &["warm", "balmy"];
const HOT_KEYWORDS: &[&str] = &["hot", "scorching", "heatwave", "sweltering"];
const MILD_KEYWORDS: &[&str] = &["mild", "moderate", "temperate"];

const RAINY_KEYWORDS: &[&str] = &["rain", "drizzle", "shower", "wet", "storm"];
const WINDY_KEYWORDS: &[&str] = &["wind", "breezy", "gust"];
const SNOWY_KEYWORDS: &[&str] = &["snow", "sleet", "blizzard"];
const HUMID_KEYWORDS: &[&str] = &["humid", "muggy", "sticky"];
const SUNNY_KEYWORDS: &[&str] = &["sunny", "sunshine", "clear sky", "bright"];

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Parses a free-text occasion/weather description into structured signals
///
/// Case-insensitive substring matching against fixed keyword tables, so
/// identical input always yields an identical intent.
pub fn parse_intent(text: &str) -> OutfitIntent {
    let text = text.to_lowercase();
    let trimmed = text.trim();

    let occasion = if matches_any(trimmed, FORMAL_KEYWORDS) {
        Occasion::Formal
    } else if matches_any(trimmed, WORK_KEYWORDS) {
        Occasion::Work
    } else if matches_any(trimmed, SPORT_KEYWORDS) {
        Occasion::Sport
    } else if !trimmed.is_empty() {
        Occasion::Casual
    } else {
        Occasion::Unknown
    };

    let temperature = if matches_any(trimmed, COLD_KEYWORDS) {
        Temperature::Cold
    } else if matches_any(trimmed, COOL_KEYWORDS) {
        Temperature::Cool
    } else if matches_any(trimmed, WARM_KEYWORDS) {
        Temperature::Warm
    } else if matches_any(trimmed, HOT_KEYWORDS) {
        Temperature::Hot
    } else if matches_any(trimmed, MILD_KEYWORDS) {
        Temperature::Mild
    } else {
        Temperature::Unknown
    };

    let mut conditions = Vec::new();
    if matches_any(trimmed, RAINY_KEYWORDS) {
        conditions.push(Condition::Rainy);
    }
    if matches_any(trimmed, WINDY_KEYWORDS) {
        conditions.push(Condition::Windy);
    }
    if matches_any(trimmed, SNOWY_KEYWORDS) {
        conditions.push(Condition::Snowy);
    }
    if matches_any(trimmed, HUMID_KEYWORDS) {
        conditions.push(Condition::Humid);
    }
    if matches_any(trimmed, SUNNY_KEYWORDS) {
        conditions.push(Condition::Sunny);
    }

    OutfitIntent {
        occasion,
        temperature,
        conditions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_unknown() {
        let intent = parse_intent("");
        assert_eq!(intent.occasion, Occasion::Unknown);
        assert_eq!(intent.temperature, Temperature::Unknown);
        assert!(intent.conditions.is_empty());
    }

    #[test]
    fn test_nonempty_text_defaults_to_casual() {
        assert_eq!(parse_intent("lunch with friends").occasion, Occasion::Casual);
    }

    #[test]
    fn test_formal_beats_work() {
        // "business dinner at a wedding" hits both tables; formal is checked first
        let intent = parse_intent("business meeting then a wedding");
        assert_eq!(intent.occasion, Occasion::Formal);
    }

    #[test]
    fn test_work_beats_sport() {
        assert_eq!(parse_intent("gym then office").occasion, Occasion::Work);
    }

    #[test]
    fn test_sport_occasion() {
        assert_eq!(parse_intent("morning run").occasion, Occasion::Sport);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse_intent("FORMAL Dinner").occasion, Occasion::Formal);
    }

    #[test]
    fn test_freezing_is_cold_not_cool() {
        assert_eq!(parse_intent("freezing evening").temperature, Temperature::Cold);
    }

    #[test]
    fn test_snow_sets_cold_and_snowy() {
        let intent = parse_intent("walk in the snow");
        assert_eq!(intent.temperature, Temperature::Cold);
        assert!(intent.has_condition(Condition::Snowy));
    }

    #[test]
    fn test_chilly_is_cool() {
        assert_eq!(parse_intent("chilly morning").temperature, Temperature::Cool);
    }

    #[test]
    fn test_temperature_tiers() {
        assert_eq!(parse_intent("warm afternoon").temperature, Temperature::Warm);
        assert_eq!(parse_intent("hot day").temperature, Temperature::Hot);
        assert_eq!(parse_intent("mild weather").temperature, Temperature::Mild);
    }

    #[test]
    fn test_conditions_union() {
        let intent = parse_intent("windy and rainy commute");
        assert!(intent.has_condition(Condition::Rainy));
        assert!(intent.has_condition(Condition::Windy));
        assert_eq!(intent.conditions.len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let text = "rainy work day, a bit chilly";
        assert_eq!(parse_intent(text), parse_intent(text));
    }
}
