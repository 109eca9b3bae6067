//! Arrow schema for canonical records.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use serde_json::Value;

use crate::dates;
use crate::record::Record;

/// Column layout of an exported record collection.
///
/// `topic` is stored as text whether it was numeric or not. `extra` holds
/// the pass-through columns as a JSON object, null when there are none.
pub fn record_schema() -> Schema {
    Schema::new(vec![
        Field::new("text_for_analysis", DataType::Utf8, false),
        Field::new("clean_text", DataType::Utf8, false),
        Field::new("sentiment", DataType::Utf8, false),
        Field::new("sentiment_score", DataType::Float64, false),
        Field::new("nature", DataType::Utf8, false),
        Field::new("topic", DataType::Utf8, false),
        Field::new("dangerous", DataType::Boolean, false),
        Field::new(
            "created_at",
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            true,
        ),
        Field::new("score", DataType::Float64, false),
        Field::new("subreddit", DataType::Utf8, false),
        Field::new("username", DataType::Utf8, false),
        Field::new("url", DataType::Utf8, false),
        Field::new("extra", DataType::Utf8, true),
    ])
}

/// Build one batch holding every record, in collection order.
pub fn records_to_batch(records: &[Record]) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(record_schema());

    let text = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(records.iter().map(f)))
    };
    let float = |f: fn(&Record) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(records.iter().map(f)))
    };

    let topics: Vec<String> = records.iter().map(|r| r.topic.to_string()).collect();
    let created: Vec<Option<i64>> = records
        .iter()
        .map(|r| dates::interpret(&r.created_at).map(|dt| dt.timestamp_millis()))
        .collect();
    let extra: Vec<Option<String>> = records
        .iter()
        .map(|r| (!r.extra.is_empty()).then(|| Value::Object(r.extra.clone()).to_string()))
        .collect();

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.text_for_analysis.as_str()),
        text(|r| r.clean_text.as_str()),
        text(|r| r.sentiment.as_str()),
        float(|r| r.sentiment_score),
        text(|r| r.nature.as_str()),
        Arc::new(StringArray::from(topics)),
        Arc::new(BooleanArray::from(
            records.iter().map(|r| r.dangerous).collect::<Vec<_>>(),
        )),
        Arc::new(TimestampMillisecondArray::from(created).with_timezone("UTC")),
        float(|r| r.score),
        text(|r| r.subreddit.as_str()),
        text(|r| r.username.as_str()),
        text(|r| r.url.as_str()),
        Arc::new(StringArray::from(extra)),
    ];

    RecordBatch::try_new(schema, columns)
}
