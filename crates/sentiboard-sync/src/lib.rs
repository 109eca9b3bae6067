//! Backend transport: report metadata, regeneration, and file download.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ReportClient, ReportError};
