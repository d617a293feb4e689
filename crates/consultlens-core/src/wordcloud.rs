//! Lookup of precomputed word-cloud images by consultation and stance filter.
//!
//! The images themselves are produced offline; this table only maps
//! `(consultation id, stance filter)` to an asset reference. A missing entry
//! means "no word cloud for this filter" and is not an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::comment::Stance;
use crate::error::CoreError;
use crate::filter::StanceFilter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCloudAsset {
    pub image: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordCloudTable {
    entries: HashMap<u64, HashMap<StanceFilter, Vec<WordCloudAsset>>>,
}

impl WordCloudTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table shipped with the binary, covering the seeded consultations.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        let seeded: [(u64, &[StanceFilter]); 3] = [
            (
                1,
                &[
                    StanceFilter::All,
                    StanceFilter::Only(Stance::Positive),
                    StanceFilter::Only(Stance::Negative),
                    StanceFilter::Only(Stance::Neutral),
                ],
            ),
            (
                2,
                &[
                    StanceFilter::All,
                    StanceFilter::Only(Stance::Positive),
                    StanceFilter::Only(Stance::Negative),
                ],
            ),
            (3, &[StanceFilter::All]),
        ];
        for (id, filters) in seeded {
            for &filter in filters {
                let slug = filter.as_str().to_ascii_lowercase();
                table.insert(
                    id,
                    filter,
                    WordCloudAsset {
                        image: format!("/wordclouds/consultation-{id}-{slug}.png"),
                        alt: format!("Word cloud for consultation {id} ({filter} comments)"),
                    },
                );
            }
        }
        table
    }

    /// Parse a table from JSON: `{"<id>": {"<All|Positive|...>": [{"image", "alt"}]}}`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: HashMap<String, HashMap<String, Vec<WordCloudAsset>>> =
            serde_json::from_str(json)?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, by_stance) in raw {
            let id: u64 = key
                .trim()
                .parse()
                .map_err(|_| CoreError::WordCloudKey(key.clone()))?;
            let mut parsed = HashMap::with_capacity(by_stance.len());
            for (stance, assets) in by_stance {
                parsed.insert(stance.parse::<StanceFilter>()?, assets);
            }
            entries.insert(id, parsed);
        }
        Ok(Self { entries })
    }

    /// Append an asset for `(id, filter)`; the first asset inserted is the one selected.
    pub fn insert(&mut self, id: u64, filter: StanceFilter, asset: WordCloudAsset) {
        self.entries
            .entry(id)
            .or_default()
            .entry(filter)
            .or_default()
            .push(asset);
    }

    /// The asset to show for this consultation and filter, if any.
    pub fn select(&self, id: u64, filter: StanceFilter) -> Option<&WordCloudAsset> {
        self.entries.get(&id)?.get(&filter)?.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
