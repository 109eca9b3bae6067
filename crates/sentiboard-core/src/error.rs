use thiserror::Error;

/// Structural ingestion failure. The whole input is rejected; no partial
/// collection is returned.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("input has no header row")]
    MissingHeader,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure loading an external stop-word table.
#[derive(Debug, Error)]
#[error("cannot read stop-word table {path}: {source}")]
pub struct StopWordError {
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
