//! Row normalization: raw cells in, one canonical record (or a drop) out.
//!
//! Field-level problems never fail a row. A missing, malformed, or
//! oddly-typed value falls back to the field's default. The only way a row
//! disappears is the empty-content rule on `clean_text`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::columns::Column;
use crate::dates;
use crate::record::{CanonicalField, DEFAULT_NATURE, DEFAULT_SENTIMENT, Record, Topic};

/// One source row, keyed by resolved column.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    known: HashMap<CanonicalField, Value>,
    passthrough: Map<String, Value>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cell. A later value for the same column replaces an earlier one.
    pub fn insert(&mut self, column: &Column, value: Value) {
        match column {
            Column::Canonical(field) => {
                self.known.insert(*field, value);
            }
            Column::Passthrough(header) => {
                self.passthrough.insert(header.clone(), value);
            }
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&Value> {
        self.known.get(&field)
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Column, Value)>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.insert(&column, value);
        }
        row
    }
}

/// Turns raw rows into canonical records.
///
/// Relative dates and missing timestamps are resolved against a single
/// reference instant, so every record of one ingestion agrees on "now".
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    reference: DateTime<Utc>,
}

impl Normalizer {
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Normalize one row. Returns `None` when the row has no content.
    pub fn normalize(&self, row: RawRow) -> Option<Record> {
        let text_for_analysis = text(row.get(CanonicalField::TextForAnalysis));
        let clean_text = text(row.get(CanonicalField::CleanText))
            .or_else(|| text_for_analysis.clone())
            .unwrap_or_default();

        if clean_text.trim().is_empty() {
            return None;
        }

        let created_at = text(row.get(CanonicalField::CreatedAt))
            .and_then(|raw| dates::interpret_at(&raw, self.reference))
            .unwrap_or_else(|| self.reference.fixed_offset());

        Some(Record {
            text_for_analysis: text_for_analysis.unwrap_or_default(),
            clean_text,
            sentiment: text(row.get(CanonicalField::Sentiment))
                .unwrap_or_else(|| DEFAULT_SENTIMENT.to_string()),
            sentiment_score: number(row.get(CanonicalField::SentimentScore)),
            nature: text(row.get(CanonicalField::Nature))
                .unwrap_or_else(|| DEFAULT_NATURE.to_string()),
            topic: topic(row.get(CanonicalField::Topic)),
            dangerous: row.get(CanonicalField::Dangerous).is_some_and(truthy_flag),
            created_at: dates::format_timestamp(&created_at),
            score: number(row.get(CanonicalField::Score)),
            subreddit: text(row.get(CanonicalField::Subreddit)).unwrap_or_default(),
            username: text(row.get(CanonicalField::Username)).unwrap_or_default(),
            url: text(row.get(CanonicalField::Url)).unwrap_or_default(),
            extra: row.passthrough,
        })
    }
}

/// Boolean normalization for flag columns.
///
/// Booleans pass through. Text is true only for `true`, `1` or `yes`
/// (case-insensitive, trimmed). Other values follow truthiness: non-zero
/// numbers, arrays and objects are true; `null` is false.
pub fn truthy_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let lower = s.trim().to_lowercase();
            lower == "true" || lower == "1" || lower == "yes"
        }
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce a cell to text. Missing, `null` and empty strings are absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse a numeric cell, falling back to zero.
fn number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// Integer topics become ids; anything else keeps its text.
fn topic(value: Option<&Value>) -> Topic {
    match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) => Topic::Id(id),
            None => Topic::Label(n.to_string()),
        },
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(id) => Topic::Id(id),
            Err(_) => Topic::Label(s.clone()),
        },
        Some(Value::Null) | None => Topic::default(),
        Some(other) => Topic::Label(other.to_string()),
    }
}
