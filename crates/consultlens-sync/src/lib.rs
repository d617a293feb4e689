//! Source adapter: pulls consultation metadata and raw comment rows over HTTP.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{SourceClient, SourceError};
