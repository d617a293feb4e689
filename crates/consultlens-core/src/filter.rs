//! Stance filtering and free-text search over a comment collection.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::comment::{Comment, Stance};
use crate::error::CoreError;

/// Either every stance (`All`) or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StanceFilter {
    #[default]
    All,
    Only(Stance),
}

impl StanceFilter {
    pub fn matches(&self, stance: Stance) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == stance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(stance) => stance.as_str(),
        }
    }
}

impl FromStr for StanceFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Stance::parse(s)
            .map(Self::Only)
            .ok_or_else(|| CoreError::UnknownStance(s.to_string()))
    }
}

impl fmt::Display for StanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StanceFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Matches of a filter, borrowed from the collection, plus the collection size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView<'a> {
    pub comments: Vec<&'a Comment>,
    pub total: usize,
}

impl FilteredView<'_> {
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Order-preserving subsequence of `comments` passing both predicates.
///
/// The stance predicate is skipped for [`StanceFilter::All`]; the text
/// predicate is skipped for an empty query and otherwise matches the
/// lower-cased query as a substring of the submitter, the summary, or any
/// keyword.
pub fn filter_comments<'a>(
    comments: &'a [Comment],
    stance: StanceFilter,
    query: &str,
) -> FilteredView<'a> {
    let needle = query.to_lowercase();
    let matched = comments
        .iter()
        .filter(|c| stance.matches(c.stance))
        .filter(|c| needle.is_empty() || matches_text(c, &needle))
        .collect();

    FilteredView {
        comments: matched,
        total: comments.len(),
    }
}

fn matches_text(comment: &Comment, needle: &str) -> bool {
    comment.submitter.to_lowercase().contains(needle)
        || comment.summary.to_lowercase().contains(needle)
        || comment
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(needle))
}
