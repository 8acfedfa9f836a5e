use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

pub mod feedback;
pub mod intent;
pub mod item;
pub mod role;

pub use feedback::FeedbackStore;
pub use intent::{Condition, Occasion, OutfitIntent, Temperature};
pub use item::CatalogItem;
pub use role::Role;

/// An sRGB color value with 8-bit components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts to (hue in degrees [0, 360), saturation [0, 1], value [0, 1])
    ///
    /// Hue is 0 for achromatic colors.
    pub fn hsv(&self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        (hue, saturation, max)
    }

    /// Hue angle in degrees [0, 360)
    pub fn hue(&self) -> f32 {
        self.hsv().0
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Closed taxonomy of human-readable color names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorName {
    Black,
    White,
    LightGray,
    DarkGray,
    Gray,
    Red,
    Orange,
    Brown,
    Yellow,
    Olive,
    Green,
    Teal,
    Blue,
    Purple,
    Magenta,
    Colored,
}

impl ColorName {
    /// Neutral colors harmonize with anything
    pub fn is_neutral(&self) -> bool {
        matches!(
            self,
            ColorName::Black
                | ColorName::White
                | ColorName::LightGray
                | ColorName::DarkGray
                | ColorName::Gray
                | ColorName::Brown
        )
    }
}

impl Display for ColorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColorName::Black => "Black",
            ColorName::White => "White",
            ColorName::LightGray => "Light Gray",
            ColorName::DarkGray => "Dark Gray",
            ColorName::Gray => "Gray",
            ColorName::Red => "Red",
            ColorName::Orange => "Orange",
            ColorName::Brown => "Brown",
            ColorName::Yellow => "Yellow",
            ColorName::Olive => "Olive",
            ColorName::Green => "Green",
            ColorName::Teal => "Teal",
            ColorName::Blue => "Blue",
            ColorName::Purple => "Purple",
            ColorName::Magenta => "Magenta",
            ColorName::Colored => "Colored",
        };
        write!(f, "{}", name)
    }
}

/// Lifecycle state of an ingestion job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Failed,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A queued image-ingestion job
///
/// Transitions are driven solely by the worker: queued → processing →
/// done | failed. A job found in `processing` at load time is reset to
/// `queued` since in-flight work never survives a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingJob {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    pub error: Option<String>,
    /// Captured image awaiting ingestion
    pub image_data: Vec<u8>,
    /// Small preview thumbnail (PNG bytes)
    pub thumbnail: Vec<u8>,
}

impl ProcessingJob {
    pub fn new(image_data: Vec<u8>, thumbnail: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            status: JobStatus::Queued,
            error: None,
            image_data,
            thumbnail,
        }
    }

    /// Done and failed jobs are eligible for bulk-clearing
    pub fn is_finished(&self) -> bool {
        matches!(self.status, JobStatus::Done | JobStatus::Failed)
    }
}

/// A recommended outfit: four optional slots plus a human-readable reason
///
/// Equality compares the identifiers of the four slots; the reason text is
/// presentation only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outfit {
    pub top: Option<CatalogItem>,
    pub bottom: Option<CatalogItem>,
    pub outerwear: Option<CatalogItem>,
    pub shoes: Option<CatalogItem>,
    pub reason: String,
}

impl Outfit {
    /// Identifiers of the four slots, in (top, bottom, outerwear, shoes) order
    pub fn slot_ids(&self) -> [Option<Uuid>; 4] {
        [
            self.top.as_ref().map(|i| i.id),
            self.bottom.as_ref().map(|i| i.id),
            self.outerwear.as_ref().map(|i| i.id),
            self.shoes.as_ref().map(|i| i.id),
        ]
    }
}

impl PartialEq for Outfit {
    fn eq(&self, other: &Self) -> bool {
        self.slot_ids() == other.slot_ids()
    }
}

/// Immutable snapshot of a surfaced outfit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionHistoryEntry {
    pub top_id: Option<Uuid>,
    pub bottom_id: Option<Uuid>,
    pub outerwear_id: Option<Uuid>,
    pub shoes_id: Option<Uuid>,
    pub suggested_at: DateTime<Utc>,
}

impl SuggestionHistoryEntry {
    pub fn from_outfit(outfit: &Outfit) -> Self {
        let [top_id, bottom_id, outerwear_id, shoes_id] = outfit.slot_ids();
        Self {
            top_id,
            bottom_id,
            outerwear_id,
            shoes_id,
            suggested_at: Utc::now(),
        }
    }
}
