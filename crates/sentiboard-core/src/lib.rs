//! Report ingestion and dashboard views for social-media sentiment reports.
//!
//! Text in (CSV or JSON), canonical [`Record`]s out, then derived
//! [`Views`] for charts. Nothing here does I/O beyond reading the input
//! it is handed.

pub mod aggregate;
pub mod columns;
pub mod dates;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod normalize;
pub mod record;
pub mod report;
pub mod schema;
pub mod stopwords;
pub mod summary;
pub mod tokenize;

pub use aggregate::{Aggregator, LabelCount, Views};
pub use columns::{Column, ColumnResolver};
pub use error::{IngestError, StopWordError};
pub use filter::RecordFilter;
pub use ingest::{Ingestor, parse_csv, parse_json};
pub use normalize::Normalizer;
pub use record::{CanonicalField, Record, Topic};
pub use report::{ReportMeta, RerunIntent, RerunResponse};
pub use stopwords::StopWords;
pub use summary::Summary;
