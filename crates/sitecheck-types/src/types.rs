//! Inspection data model

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Highest score an area or inspection can carry
pub const MAX_SCORE: u8 = 100;

/// Score given to freshly imported (unscored) areas
pub const DEFAULT_AREA_SCORE: u8 = MAX_SCORE;

/// Inspections scoring at or above this are `passed`
pub const PASS_THRESHOLD: u8 = 80;

/// Clamp an arbitrary numeric score into [0, 100]
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, MAX_SCORE as i64) as u8
}

/// Deserialize a score leniently: fractional values are rounded, out-of-range
/// values clamped, null becomes 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(v) if v.is_finite() => clamp_score(v.round() as i64),
        _ => 0,
    })
}

/// One inspected location or task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Display label, never empty after import
    pub name: String,

    /// Quality rating in [0, 100]
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,

    #[serde(default)]
    pub notes: String,

    /// Encoded photos (data URLs) in attachment order
    #[serde(default)]
    pub photos: Vec<String>,

    /// Single photo field written by early dashboard versions
    #[serde(default, rename = "photoData", skip_serializing_if = "Option::is_none")]
    pub legacy_photo: Option<String>,
}

impl Area {
    /// New unscored area as produced by checklist import
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: DEFAULT_AREA_SCORE,
            notes: String::new(),
            photos: Vec::new(),
            legacy_photo: None,
        }
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.set_score(score);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the score, clamped to [0, 100]
    pub fn set_score(&mut self, score: i64) {
        self.score = clamp_score(score);
    }

    /// Photos to display: `photos`, or the legacy single photo when there are none
    pub fn stored_photos(&self) -> Vec<&str> {
        match self.legacy_photo {
            Some(ref photo) if self.photos.is_empty() => vec![photo.as_str()],
            _ => self.photos.iter().map(String::as_str).collect(),
        }
    }
}

/// Derived inspection outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InspectionStatus {
    Passed,
    NeedsAttention,
}

impl InspectionStatus {
    pub fn from_score(score: u8) -> Self {
        if score >= PASS_THRESHOLD {
            InspectionStatus::Passed
        } else {
            InspectionStatus::NeedsAttention
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InspectionStatus::Passed => "Passed",
            InspectionStatus::NeedsAttention => "Needs Attention",
        }
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InspectionStatus::Passed => write!(f, "passed"),
            InspectionStatus::NeedsAttention => write!(f, "needs-attention"),
        }
    }
}

/// One submitted inspection event
///
/// `score` and `status` are derived from `areas` at submission time and are
/// never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: String,
    pub client_id: String,
    pub site: String,
    pub inspector: String,
    /// Submission time
    pub date: DateTime<Utc>,
    pub areas: Vec<Area>,
    pub score: u8,
    pub status: InspectionStatus,
}

impl Inspection {
    /// Total number of photos across all areas
    pub fn photo_count(&self) -> usize {
        self.areas.iter().map(|a| a.stored_photos().len()).sum()
    }

    pub fn is_passed(&self) -> bool {
        self.status == InspectionStatus::Passed
    }
}

/// Aggregate view over a set of inspections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total: usize,
    pub avg_score: u8,
    /// Percentage of passed inspections, 0-100
    pub pass_rate: u8,
    #[serde(rename = "last7Days")]
    pub last_7_days: usize,
}

/// Client roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub sites: Vec<String>,
}

/// Declared kind of an uploaded checklist file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChecklistKind {
    /// Comma-delimited, task name in first column
    Csv,
    /// One area per line, bullets optional
    PlainText,
    /// JSON array or object
    Structured,
}

impl ChecklistKind {
    /// Determine the kind from a file name suffix
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(ChecklistKind::Csv),
            "txt" => Some(ChecklistKind::PlainText),
            "json" => Some(ChecklistKind::Structured),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChecklistKind::Csv => "CSV",
            ChecklistKind::PlainText => "TXT",
            ChecklistKind::Structured => "JSON",
        }
    }
}
