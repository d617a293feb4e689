//! Normalisation of loosely-typed comment rows into [`Comment`]s.
//!
//! Upstream producers disagree on field names (`commenter_name` vs
//! `submitter`, `sentiment` vs `stance`, ...), so every canonical field is
//! resolved through an ordered table of `(source field, extractor)` pairs.
//! The first pair whose field is present and whose extractor accepts the
//! value wins; if none does, the field takes its documented default.
//!
//! | canonical         | candidates                                        | default        |
//! |-------------------|---------------------------------------------------|----------------|
//! | `id`              | comments_id, id, comment_id, commentsid           | `row-{index}`  |
//! | `submitter`       | commenter_name, submitter                         | `Anonymous`    |
//! | `stakeholder_type`| stakeholder_type, stakeholderType                 | `Individual`   |
//! | `date`            | created_at, date (parsed, then literal)           | empty          |
//! | `stance`          | sentiment, stance                                 | `Neutral`      |
//! | `summary`         | comment_data, summary                             | empty          |
//! | `confidence_score`| confidence_score, confidenceScore, ..._ensemble_model | `0`        |
//! | `original_text`   | comment_data, originalText                        | empty          |
//! | `keywords`        | keywords                                          | `[]`           |
//! | `ml_model`        | ml_model, model                                   | none           |
//!
//! Normalisation is total: no row is ever dropped and no input makes it fail.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::comment::{Comment, Stance};

pub const DEFAULT_SUBMITTER: &str = "Anonymous";
pub const DEFAULT_STAKEHOLDER: &str = "Individual";
pub const MAX_CONFIDENCE: f64 = 5.0;

type Extractor<T> = fn(&Value) -> Option<T>;

/// Ordered `(source field, extractor)` pairs for one canonical field.
type Candidates<T> = &'static [(&'static str, Extractor<T>)];

const ID: Candidates<String> = &[
    ("comments_id", text),
    ("id", text),
    ("comment_id", text),
    ("commentsid", text),
];

const SUBMITTER: Candidates<String> = &[("commenter_name", text), ("submitter", text)];

const STAKEHOLDER: Candidates<String> = &[("stakeholder_type", text), ("stakeholderType", text)];

// Parsed timestamps beat literals, whichever field they come from.
const DATE: Candidates<String> = &[
    ("created_at", iso_date),
    ("date", iso_date),
    ("created_at", text),
    ("date", text),
];

const STANCE: Candidates<Stance> = &[("sentiment", stance), ("stance", stance)];

const SUMMARY: Candidates<String> = &[("comment_data", text), ("summary", text)];

const CONFIDENCE: Candidates<f64> = &[
    ("confidence_score", confidence),
    ("confidenceScore", confidence),
    ("confidenceScore_based_on_ensemble_model", confidence),
];

const ORIGINAL_TEXT: Candidates<String> = &[("comment_data", text), ("originalText", text)];

const KEYWORDS: Candidates<Vec<String>> = &[("keywords", keywords)];

const ML_MODEL: Candidates<String> = &[("ml_model", text), ("model", text)];

fn resolve<T>(row: &Map<String, Value>, candidates: Candidates<T>) -> Option<T> {
    candidates
        .iter()
        .find_map(|(field, extract)| row.get(*field).and_then(extract))
}

/// Normalise a batch of raw rows, one [`Comment`] per row, in input order.
///
/// Ids are unique within the returned collection: a missing id, or one that
/// repeats an earlier row's id, is replaced by a generated `row-{index}`.
pub fn normalize_rows(rows: &[Value], consultation_id: u64) -> Vec<Comment> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut reassigned = 0usize;

    let comments: Vec<Comment> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut comment = normalize_row(row, index, consultation_id);
            if seen.contains(&comment.id) {
                comment.id = unused_id(&seen, index);
                reassigned += 1;
            }
            seen.insert(comment.id.clone());
            comment
        })
        .collect();

    debug!(
        rows = rows.len(),
        consultation_id, reassigned, "normalised comment rows"
    );
    comments
}

/// Normalise a single raw row. Non-object rows normalise as an empty field bag.
pub fn normalize_row(row: &Value, index: usize, consultation_id: u64) -> Comment {
    let empty = Map::new();
    let row = row.as_object().unwrap_or(&empty);

    Comment {
        id: resolve(row, ID).unwrap_or_else(|| format!("row-{index}")),
        submitter: resolve(row, SUBMITTER).unwrap_or_else(|| DEFAULT_SUBMITTER.to_string()),
        stakeholder_type: resolve(row, STAKEHOLDER)
            .unwrap_or_else(|| DEFAULT_STAKEHOLDER.to_string()),
        date: resolve(row, DATE).unwrap_or_default(),
        stance: resolve(row, STANCE).unwrap_or_default(),
        summary: resolve(row, SUMMARY).unwrap_or_default(),
        confidence_score: resolve(row, CONFIDENCE).unwrap_or(0.0),
        original_text: resolve(row, ORIGINAL_TEXT).unwrap_or_default(),
        keywords: resolve(row, KEYWORDS).unwrap_or_default(),
        ml_model: resolve(row, ML_MODEL),
        consultation_id,
    }
}

fn unused_id(seen: &HashSet<String>, index: usize) -> String {
    let base = format!("row-{index}");
    if !seen.contains(&base) {
        return base;
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{base}-{n}");
        if !seen.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ── Extractors ──

/// Non-empty strings and numbers; everything else falls through.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn stance(value: &Value) -> Option<Stance> {
    value.as_str().and_then(Stance::parse)
}

/// Finite number (or numeric string), clamped into `[0, 5]`.
fn confidence(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    raw.is_finite().then(|| raw.clamp(0.0, MAX_CONFIDENCE))
}

fn keywords(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
    )
}

/// Calendar date (`YYYY-MM-DD`, UTC) of a timestamp string or epoch-millis number.
fn iso_date(value: &Value) -> Option<String> {
    let date = match value {
        Value::Number(n) => DateTime::from_timestamp_millis(epoch_millis(n)?)?.date_naive(),
        Value::String(s) => parse_date(s.trim())?,
        _ => return None,
    };
    Some(date.format("%Y-%m-%d").to_string())
}

/// Integral millis, or a finite float truncated toward zero.
fn epoch_millis(n: &serde_json::Number) -> Option<i64> {
    if let Some(ms) = n.as_i64() {
        return Some(ms);
    }
    let ms = n.as_f64()?.trunc();
    (ms.is_finite() && ms >= i64::MIN as f64 && ms < i64::MAX as f64).then_some(ms as i64)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // RFC 3339, HTTP-date / RFC 2822, then ISO with a colon-less offset.
    let zoned = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"));
    if let Ok(dt) = zoned {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// ── Helpers shared with consultation metadata decoding ──

pub(crate) fn first_text(row: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| row.get(*field).and_then(text))
}

pub(crate) fn first_count(row: &Map<String, Value>, fields: &[&str]) -> Option<u64> {
    fields.iter().find_map(|field| match row.get(*field)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
