use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown stance {0:?} (expected All, Positive, Negative or Neutral)")]
    UnknownStance(String),

    #[error("invalid word-cloud table: {0}")]
    WordCloudTable(#[from] serde_json::Error),

    #[error("word-cloud table key {0:?} is not a consultation id")]
    WordCloudKey(String),
}
