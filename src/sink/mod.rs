//! Dataset sink: JSONL serialization and object-store upload.

use crate::dataset::{IndexRecord, to_jsonl};
use crate::storage::GcsClient;
use crate::types::IngestError;

/// What the sink did with the run's records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkOutcome {
    /// The dataset object was written.
    Written {
        object: String,
        records: usize,
        bytes: usize,
    },
    /// No records were produced; nothing was written.
    Empty,
}

/// Writes the accumulated dataset to a single object in the bucket.
///
/// The whole collection is serialized into one buffer and uploaded in one
/// request, so a failed upload leaves no partial object that could be
/// mistaken for a complete dataset. An upload failure is fatal for the run.
pub struct DatasetSink {
    client: GcsClient,
    bucket: String,
    object: String,
}

impl DatasetSink {
    /// Sink writing to `object` (already prefixed with the output folder)
    /// inside `bucket`.
    pub fn new(client: GcsClient, bucket: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            object: object.into(),
        }
    }

    /// Destination object name.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Persists the records, or reports that there is nothing to persist.
    pub async fn write(&self, records: &[IndexRecord]) -> Result<SinkOutcome, IngestError> {
        if records.is_empty() {
            tracing::warn!("no records produced, skipping dataset upload");
            return Ok(SinkOutcome::Empty);
        }

        let body = to_jsonl(records)?;
        let bytes = body.len();
        self.client
            .upload(&self.bucket, &self.object, "application/json", body.into_bytes())
            .await?;

        tracing::info!(
            bucket = %self.bucket,
            object = %self.object,
            records = records.len(),
            bytes,
            "dataset uploaded"
        );
        Ok(SinkOutcome::Written {
            object: self.object.clone(),
            records: records.len(),
            bytes,
        })
    }
}
