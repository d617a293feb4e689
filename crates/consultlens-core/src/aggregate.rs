//! Read-only statistics over a comment collection.
//!
//! Everything here is a pure function of the slice it is given and is cheap
//! enough to recompute whenever the collection changes.

use std::collections::HashMap;

use serde::Serialize;

use crate::comment::{Comment, Stance};

/// Lower bound (inclusive) of the high-confidence bucket.
pub const HIGH_CONFIDENCE: f64 = 4.0;
/// Lower bound (inclusive) of the medium-confidence bucket.
pub const MEDIUM_CONFIDENCE: f64 = 3.0;
/// Reported as the most active stakeholder type of an empty collection.
pub const NO_STAKEHOLDER: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StanceCount {
    pub stance: Stance,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderCount {
    pub stakeholder_type: String,
    pub count: usize,
    /// Percentage of the collection, `0.0..=100.0`.
    pub share: f64,
}

/// Counts per confidence band: high `[4, 5]`, medium `[3, 4)`, low `[0, 3)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfidenceBuckets {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// The full statistics bundle shown alongside a consultation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    /// One entry per stance in [`Stance::ALL`] order, zero counts included.
    pub stances: Vec<StanceCount>,
    /// Stakeholder types in first-encountered order.
    pub stakeholders: Vec<StakeholderCount>,
    pub confidence: ConfidenceBuckets,
    pub mean_confidence: f64,
    pub top_stakeholder: String,
}

impl Summary {
    /// Stance counts with zero entries dropped, ready for a chart legend.
    pub fn stance_distribution(&self) -> Vec<StanceCount> {
        self.stances.iter().copied().filter(|s| s.count > 0).collect()
    }

    pub fn stance_count(&self, stance: Stance) -> usize {
        self.stances
            .iter()
            .find(|s| s.stance == stance)
            .map_or(0, |s| s.count)
    }
}

/// Compute every statistic in one call.
pub fn summarize(comments: &[Comment]) -> Summary {
    let stakeholders = stakeholder_histogram(comments);
    let top_stakeholder = most_active_stakeholder(&stakeholders);
    Summary {
        total: comments.len(),
        stances: stance_histogram(comments),
        stakeholders,
        confidence: confidence_buckets(comments),
        mean_confidence: mean_confidence(comments),
        top_stakeholder,
    }
}

pub fn stance_histogram(comments: &[Comment]) -> Vec<StanceCount> {
    Stance::ALL
        .into_iter()
        .map(|stance| StanceCount {
            stance,
            count: comments.iter().filter(|c| c.stance == stance).count(),
        })
        .collect()
}

/// Histogram keyed on whatever stakeholder types occur, in first-seen order.
pub fn stakeholder_histogram(comments: &[Comment]) -> Vec<StakeholderCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for comment in comments {
        let key = comment.stakeholder_type.as_str();
        match index.get(key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    let total = comments.len();
    counts
        .into_iter()
        .map(|(kind, count)| StakeholderCount {
            stakeholder_type: kind.to_string(),
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

pub fn confidence_buckets(comments: &[Comment]) -> ConfidenceBuckets {
    let mut buckets = ConfidenceBuckets::default();
    for comment in comments {
        let score = comment.confidence_score;
        if score >= HIGH_CONFIDENCE {
            buckets.high += 1;
        } else if score >= MEDIUM_CONFIDENCE {
            buckets.medium += 1;
        } else {
            buckets.low += 1;
        }
    }
    buckets
}

/// Arithmetic mean of the confidence scores; `0.0` for an empty collection.
pub fn mean_confidence(comments: &[Comment]) -> f64 {
    if comments.is_empty() {
        return 0.0;
    }
    let sum: f64 = comments.iter().map(|c| c.confidence_score).sum();
    sum / comments.len() as f64
}

/// Argmax of the histogram; ties go to the type encountered first.
pub fn most_active_stakeholder(histogram: &[StakeholderCount]) -> String {
    let mut best: Option<&StakeholderCount> = None;
    for entry in histogram {
        if best.is_none_or(|b| entry.count > b.count) {
            best = Some(entry);
        }
    }
    best.map_or_else(|| NO_STAKEHOLDER.to_string(), |b| b.stakeholder_type.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_rows;
    use serde_json::json;

    fn comment(stakeholder: &str, stance: Stance, score: f64) -> Comment {
        Comment {
            id: format!("{stakeholder}-{score}"),
            submitter: "someone".into(),
            stakeholder_type: stakeholder.into(),
            date: String::new(),
            stance,
            summary: String::new(),
            confidence_score: score,
            original_text: String::new(),
            keywords: Vec::new(),
            ml_model: None,
            consultation_id: 1,
        }
    }

    #[test]
    fn empty_collection() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_confidence, 0.0);
        assert_eq!(summary.top_stakeholder, "N/A");
        assert!(summary.stakeholders.is_empty());
        assert!(summary.stance_distribution().is_empty());
        assert_eq!(summary.stances.len(), 3);
        assert_eq!(summary.confidence, ConfidenceBuckets::default());
    }

    #[test]
    fn normalised_example_mean() {
        let rows = vec![
            json!({"sentiment": "Negative", "confidence_score": 4.2, "commenter_name": "ACME Corp"}),
            json!({"stance": "Positive", "submitter": "Jane Doe"}),
        ];
        let summary = summarize(&normalize_rows(&rows, 1));
        assert!((summary.mean_confidence - 2.1).abs() < 1e-9);
        assert_eq!(summary.stance_count(Stance::Negative), 1);
        assert_eq!(summary.stance_count(Stance::Positive), 1);
        assert_eq!(summary.stance_count(Stance::Neutral), 0);
        assert_eq!(summary.top_stakeholder, "Individual");
    }

    #[test]
    fn stance_counts_sum_to_total() {
        let comments = vec![
            comment("NGO", Stance::Positive, 1.0),
            comment("NGO", Stance::Positive, 2.0),
            comment("Industry", Stance::Neutral, 3.0),
            comment("Academic", Stance::Negative, 4.0),
            comment("Industry", Stance::Neutral, 5.0),
        ];
        let histogram = stance_histogram(&comments);
        let sum: usize = histogram.iter().map(|s| s.count).sum();
        assert_eq!(sum, comments.len());
    }

    #[test]
    fn distribution_omits_zero_counts() {
        let comments = vec![
            comment("NGO", Stance::Negative, 1.0),
            comment("NGO", Stance::Neutral, 1.0),
        ];
        let dist = summarize(&comments).stance_distribution();
        let stances: Vec<Stance> = dist.iter().map(|s| s.stance).collect();
        assert_eq!(stances, vec![Stance::Negative, Stance::Neutral]);
    }

    #[test]
    fn confidence_bucket_boundaries() {
        let comments: Vec<Comment> = [0.0, 2.99, 3.0, 3.99, 4.0, 5.0]
            .into_iter()
            .map(|s| comment("NGO", Stance::Neutral, s))
            .collect();
        let buckets = confidence_buckets(&comments);
        assert_eq!(
            buckets,
            ConfidenceBuckets {
                high: 2,
                medium: 2,
                low: 2
            }
        );
    }

    #[test]
    fn stakeholder_histogram_preserves_first_seen_order() {
        let comments = vec![
            comment("Industry", Stance::Neutral, 1.0),
            comment("NGO", Stance::Neutral, 1.0),
            comment("Industry", Stance::Neutral, 1.0),
            comment("Academic", Stance::Neutral, 1.0),
        ];
        let histogram = stakeholder_histogram(&comments);
        let kinds: Vec<&str> = histogram
            .iter()
            .map(|s| s.stakeholder_type.as_str())
            .collect();
        assert_eq!(kinds, vec!["Industry", "NGO", "Academic"]);
        assert_eq!(histogram[0].count, 2);
        assert!((histogram[0].share - 50.0).abs() < 1e-9);
        assert!((histogram[1].share - 25.0).abs() < 1e-9);
    }

    #[test]
    fn top_stakeholder_tie_goes_to_first_seen() {
        let comments = vec![
            comment("NGO", Stance::Neutral, 1.0),
            comment("Industry", Stance::Neutral, 1.0),
            comment("Industry", Stance::Neutral, 1.0),
            comment("NGO", Stance::Neutral, 1.0),
        ];
        assert_eq!(summarize(&comments).top_stakeholder, "NGO");
    }

    #[test]
    fn top_stakeholder_is_argmax() {
        let comments = vec![
            comment("NGO", Stance::Neutral, 1.0),
            comment("Industry", Stance::Neutral, 1.0),
            comment("Industry", Stance::Neutral, 1.0),
        ];
        assert_eq!(summarize(&comments).top_stakeholder, "Industry");
    }
}
