//! Parquet export of a record collection.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use parquet::arrow::ArrowWriter;
use sentiboard_core::Record;
use sentiboard_core::schema::records_to_batch;
use tracing::info;

/// Write `records` to `path` as a single-row-group Parquet file.
pub fn write_parquet(path: &Path, records: &[Record]) -> anyhow::Result<()> {
    let batch = records_to_batch(records).context("building record batch")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .with_context(|| format!("opening parquet writer {}", path.display()))?;
    writer
        .write(&batch)
        .with_context(|| format!("writing record batch {}", path.display()))?;
    writer
        .close()
        .with_context(|| format!("closing parquet writer {}", path.display()))?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote parquet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    #[test]
    fn parquet_reads_back() {
        let records = sentiboard_core::parse_csv(
            "text,sentiment,topic\nfirst post,Positive,3\nsecond post,Negative,\n",
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.parquet");
        write_parquet(&path, &records).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 2);

        let topic = batches[0]
            .column_by_name("topic")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(topic.value(0), "3");
        assert_eq!(topic.value(1), "");
        assert!(!topic.is_null(1));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let err = write_parquet(Path::new("/nonexistent/dir/out.parquet"), &[]).unwrap_err();
        assert!(err.to_string().contains("creating"));
    }
}
