use crate::models::{fields, CanonicalRecord};
use anyhow::{anyhow, Context, Result};
use arrow::array::{Array, ArrayRef, ListBuilder, StringArray, StringBuilder, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

pub struct ParquetStorage;

impl ParquetStorage {
    /// Arrow schema for persisted posts, in fixed column order.
    ///
    /// Every column is nullable so absent fields become null placeholders.
    #[must_use]
    pub fn schema() -> Schema {
        let string_list = DataType::List(Arc::new(Field::new("item", DataType::Utf8, true)));

        Schema::new(vec![
            Field::new(fields::USERNAME, DataType::Utf8, true),
            Field::new(
                fields::TIMESTAMP,
                DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
                true,
            ),
            Field::new(fields::CONTENT, DataType::Utf8, true),
            // JSON-encoded metric map
            Field::new(fields::ENGAGEMENT, DataType::Utf8, true),
            Field::new(fields::MENTIONS, string_list.clone(), true),
            Field::new(fields::HASHTAGS, string_list, true),
        ])
    }

    /// Writes canonical post records to a Parquet file.
    ///
    /// Returns the number of rows written. An empty record set is a no-op:
    /// a warning is logged and no file is created.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or if writing to the Parquet file fails.
    pub fn write_records(path: &str, records: &[CanonicalRecord]) -> Result<usize> {
        if records.is_empty() {
            tracing::warn!("No records to save, skipping write to {}", path);
            return Ok(0);
        }

        let schema = Arc::new(Self::schema());

        let usernames = StringArray::from(
            records
                .iter()
                .map(|r| Some(r.username.as_str()))
                .collect::<Vec<_>>(),
        );

        let timestamps = TimestampMillisecondArray::from(
            records
                .iter()
                .map(|r| r.timestamp.map(|ts| ts.timestamp_millis()))
                .collect::<Vec<_>>(),
        )
        .with_timezone("UTC");

        let contents = StringArray::from(
            records
                .iter()
                .map(|r| Some(r.content.as_str()))
                .collect::<Vec<_>>(),
        );

        let engagement = StringArray::from(
            records
                .iter()
                .map(|r| r.engagement.as_ref().map(serde_json::to_string).transpose())
                .collect::<Result<Vec<Option<String>>, _>>()?,
        );

        let mentions = build_string_lists(records.iter().map(|r| r.mentions.as_deref()));
        let hashtags = build_string_lists(records.iter().map(|r| Some(r.hashtags.as_slice())));

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(usernames) as ArrayRef,
                Arc::new(timestamps) as ArrayRef,
                Arc::new(contents) as ArrayRef,
                Arc::new(engagement) as ArrayRef,
                Arc::new(mentions) as ArrayRef,
                Arc::new(hashtags) as ArrayRef,
            ],
        )?;

        ensure_parent_dir(path)?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create Parquet file: {}", path))?;
        let props = WriterProperties::builder()
            .set_compression(parquet::basic::Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;

        writer.write(&batch)?;
        writer.close()?;

        tracing::info!("Saved {} records to {}", records.len(), path);
        Ok(records.len())
    }

    /// Reads the `content` column back from a Parquet file written by `write_records`.
    ///
    /// Null entries are skipped.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, is not valid Parquet,
    /// or has no string `content` column.
    pub fn read_contents(path: &str) -> Result<Vec<String>> {
        let file =
            File::open(path).with_context(|| format!("Failed to open Parquet file: {}", path))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut contents = Vec::new();
        for batch in reader {
            let batch = batch?;
            let column = batch
                .column_by_name(fields::CONTENT)
                .ok_or_else(|| anyhow!("{} has no `{}` column", path, fields::CONTENT))?;
            let strings = column
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| anyhow!("`{}` column in {} is not a string column", fields::CONTENT, path))?;

            contents.extend(strings.iter().flatten().map(str::to_string));
        }

        Ok(contents)
    }
}

fn build_string_lists<'a>(
    lists: impl Iterator<Item = Option<&'a [String]>>,
) -> arrow::array::ListArray {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for list in lists {
        match list {
            Some(items) => {
                for item in items {
                    builder.values().append_value(item);
                }
                builder.append(true);
            }
            None => builder.append_null(),
        }
    }
    builder.finish()
}

pub(crate) fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}
