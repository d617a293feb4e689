//! Consultation metadata and the per-view bundle handed to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::comment::Comment;
use crate::normalize::{first_count, first_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConsultationStatus {
    #[default]
    Draft,
    #[serde(rename = "In Progress", alias = "InProgress", alias = "in_progress")]
    InProgress,
    #[serde(
        rename = "Analysis Complete",
        alias = "AnalysisComplete",
        alias = "analysis_complete"
    )]
    AnalysisComplete,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InProgress => "In Progress",
            Self::AnalysisComplete => "Analysis Complete",
        }
    }

    /// Lenient parse: case-insensitive, ignoring spaces, `_` and `-`.
    pub fn parse(s: &str) -> Option<Self> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "draft" => Some(Self::Draft),
            "inprogress" => Some(Self::InProgress),
            "analysiscomplete" => Some(Self::AnalysisComplete),
            _ => None,
        }
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one regulatory consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationMeta {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: ConsultationStatus,
    pub submissions: u64,
    pub end_date: String,
    /// Upstream key for the comments endpoint, when the list supplies one.
    pub bill: Option<String>,
}

impl ConsultationMeta {
    /// Degraded stand-in used whenever the real metadata cannot be obtained.
    pub fn placeholder(id: u64) -> Self {
        Self {
            id,
            title: "Consultation".to_string(),
            description: String::new(),
            status: ConsultationStatus::Draft,
            submissions: 0,
            end_date: String::new(),
            bill: None,
        }
    }

    /// Decode a loosely-shaped consultation list entry.
    ///
    /// Returns `None` only when the entry has no usable integer `id`; every
    /// other field falls back to the placeholder's value.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id").and_then(parse_id)?;
        let status = first_text(obj, &["status"])
            .and_then(|s| ConsultationStatus::parse(&s))
            .unwrap_or_default();

        Some(Self {
            id,
            title: first_text(obj, &["title"]).unwrap_or_else(|| "Consultation".to_string()),
            description: first_text(obj, &["description"]).unwrap_or_default(),
            status,
            submissions: first_count(obj, &["submissions", "submission_count"]).unwrap_or(0),
            end_date: first_text(obj, &["endDate", "end_date"]).unwrap_or_default(),
            bill: first_text(obj, &["bill", "bill_key"]),
        })
    }

    /// Key used to fetch this consultation's comments: `bill` if set, else `bill_{id}`.
    pub fn bill_key(&self) -> String {
        match self.bill.as_deref().map(str::trim) {
            Some(bill) if !bill.is_empty() => bill.to_string(),
            _ => format!("bill_{}", self.id),
        }
    }
}

/// Parse a consultation id from a JSON value: integer, integral float, or numeric string.
pub fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Where a loaded bundle came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    Live,
    /// Metadata is a placeholder; `reason` says why the live data was unavailable.
    Placeholder { reason: String },
}

/// Everything one view-load produces: metadata plus the normalised comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedConsultation {
    pub meta: ConsultationMeta,
    pub comments: Vec<Comment>,
    pub provenance: Provenance,
}

impl LoadedConsultation {
    /// Placeholder metadata and an empty collection for `id`.
    pub fn degraded(id: u64, reason: impl Into<String>) -> Self {
        Self {
            meta: ConsultationMeta::placeholder(id),
            comments: Vec::new(),
            provenance: Provenance::Placeholder {
                reason: reason.into(),
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.provenance, Provenance::Placeholder { .. })
    }
}
