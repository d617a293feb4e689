//! Canonical comment model shared by the normaliser, aggregator and search.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorical position a submission takes on the consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stance {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Stance {
    /// All stances in display order.
    pub const ALL: [Stance; 3] = [Stance::Positive, Stance::Negative, Stance::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }

    /// Parse a stance label case-insensitively, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|stance| stance.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single public submission, normalised from whatever row shape upstream sent.
///
/// `confidence_score` is always within `[0, 5]` and `keywords` is never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub submitter: String,
    pub stakeholder_type: String,
    /// `YYYY-MM-DD` when the source timestamp parsed, otherwise the literal source value.
    pub date: String,
    pub stance: Stance,
    pub summary: String,
    pub confidence_score: f64,
    pub original_text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub ml_model: Option<String>,
    pub consultation_id: u64,
}
