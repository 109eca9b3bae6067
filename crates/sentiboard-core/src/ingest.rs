//! CSV and JSON ingestion into canonical records.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use tracing::{debug, info};

use crate::columns::ColumnResolver;
use crate::error::IngestError;
use crate::normalize::{Normalizer, RawRow};
use crate::record::Record;

/// Drives parsing, column resolution and normalization.
///
/// Each call produces a fresh collection; an `Ingestor` holds no state
/// between calls and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    resolver: ColumnResolver,
    reference: Option<DateTime<Utc>>,
}

impl Ingestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the instant used for relative dates and missing timestamps.
    /// Without it, each call uses the time it starts.
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.reference.unwrap_or_else(Utc::now))
    }

    /// Ingest CSV text. The first row must be the header row.
    pub fn ingest_csv(&self, text: &str) -> Result<Vec<Record>, IngestError> {
        self.ingest_reader(text.as_bytes())
    }

    /// Ingest CSV from any byte source.
    pub fn ingest_reader<R: Read>(&self, reader: R) -> Result<Vec<Record>, IngestError> {
        let normalizer = self.normalizer();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(IngestError::MissingHeader);
        }
        let columns = self.resolver.resolve_headers(headers.iter());

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for result in reader.records() {
            let row = result?;
            let raw = RawRow::from_pairs(
                columns
                    .iter()
                    .zip(row.iter())
                    .map(|(column, cell)| (column.clone(), Value::String(cell.to_string()))),
            );
            match normalizer.normalize(raw) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        debug!(dropped, "skipped rows without text");
        info!(count = records.len(), "ingested CSV records");
        Ok(records)
    }

    /// Ingest a CSV file from disk.
    pub fn ingest_path(&self, path: &Path) -> Result<Vec<Record>, IngestError> {
        let file = std::fs::File::open(path)?;
        self.ingest_reader(std::io::BufReader::new(file))
    }

    /// Ingest a JSON array of loosely-typed objects.
    ///
    /// Keys go through the same alias resolution as CSV headers, and values
    /// keep their JSON types, so booleans and numbers arrive already typed.
    pub fn ingest_json(&self, text: &str) -> Result<Vec<Record>, IngestError> {
        let normalizer = self.normalizer();
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(items) = value else {
            return Err(IngestError::NotAnArray);
        };

        let mut records = Vec::with_capacity(items.len());
        let mut dropped = 0usize;

        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(object) = item else {
                return Err(IngestError::NotAnObject { index });
            };
            let columns = self.resolver.resolve_headers(object.keys().map(|k| k.as_str()));
            let values = object.into_iter().map(|(_, v)| v);
            let raw = RawRow::from_pairs(columns.into_iter().zip(values));
            match normalizer.normalize(raw) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        debug!(dropped, "skipped objects without text");
        info!(count = records.len(), "ingested JSON records");
        Ok(records)
    }
}

/// Ingest CSV text with default settings.
pub fn parse_csv(text: &str) -> Result<Vec<Record>, IngestError> {
    Ingestor::new().ingest_csv(text)
}

/// Ingest a JSON array with default settings.
pub fn parse_json(text: &str) -> Result<Vec<Record>, IngestError> {
    Ingestor::new().ingest_json(text)
}
