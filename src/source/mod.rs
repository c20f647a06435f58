//! Document source feed: bucket listing, download, and text extraction.
//!
//! The feed yields [`RawDocument`]s lazily, one per pull, so a large corpus
//! is never materialized in memory. It is finite and non-restartable: once
//! [`DocumentFeed::next_document`] returns `None` the feed is exhausted.
//!
//! Failure policy follows the run taxonomy: a listing failure at
//! construction is fatal (nothing can be produced), while a download or
//! extraction failure for an individual object is logged and the object is
//! skipped so one bad file never stops the corpus.

pub mod extract;

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::storage::GcsClient;
use crate::types::{DocumentKind, IngestError, RawDocument};

/// Lazy, single-pass producer of extracted documents.
#[async_trait]
pub trait DocumentFeed: Send {
    /// Pulls the next well-formed document, or `None` when exhausted.
    ///
    /// Implementations only return `Err` for failures that are fatal for the
    /// run; per-document problems are handled internally.
    async fn next_document(&mut self) -> Result<Option<RawDocument>, IngestError>;
}

/// Feed over the supported documents beneath a bucket prefix.
pub struct BucketFeed {
    client: GcsClient,
    bucket: String,
    pending: VecDeque<(String, DocumentKind)>,
}

impl BucketFeed {
    /// Lists the bucket prefix and prepares the feed.
    ///
    /// Listing happens eagerly because a storage connection that cannot list
    /// is fatal for the whole run; downloads stay lazy. Objects are filtered
    /// to supported extensions, and the prefix placeholder object some tools
    /// create for "folders" is dropped.
    pub async fn connect(
        client: GcsClient,
        bucket: impl Into<String>,
        prefix: &str,
    ) -> Result<Self, IngestError> {
        let bucket = bucket.into();
        let names = client.list_objects(&bucket, prefix).await?;

        let pending: VecDeque<(String, DocumentKind)> = names
            .into_iter()
            .filter(|name| !name.eq_ignore_ascii_case(prefix))
            .filter_map(|name| DocumentKind::from_object_name(&name).map(|kind| (name, kind)))
            .collect();

        tracing::info!(
            bucket = %bucket,
            prefix = %prefix,
            documents = pending.len(),
            "listed source documents"
        );

        Ok(Self {
            client,
            bucket,
            pending,
        })
    }

    /// Number of documents not yet pulled.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    async fn load(&self, name: &str, kind: DocumentKind) -> Result<String, IngestError> {
        let bytes = self.client.download(&self.bucket, name).await?;
        extract::extract_text(kind, &bytes).map_err(|source| IngestError::Extraction {
            identifier: name.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DocumentFeed for BucketFeed {
    async fn next_document(&mut self) -> Result<Option<RawDocument>, IngestError> {
        while let Some((name, kind)) = self.pending.pop_front() {
            match self.load(&name, kind).await {
                Ok(text) if text.is_empty() => {
                    tracing::debug!(object = %name, "document has no extractable text, skipping");
                }
                Ok(text) => {
                    return Ok(Some(RawDocument {
                        identifier: name,
                        kind,
                        text,
                    }));
                }
                Err(err) => {
                    tracing::error!(object = %name, error = %err, "extraction failed, skipping document");
                }
            }
        }
        Ok(None)
    }
}

/// In-memory feed over pre-extracted documents.
///
/// Useful for tests and for callers that source documents outside object
/// storage but still want the pipeline's batching and reporting.
pub struct StaticFeed {
    pending: VecDeque<RawDocument>,
}

impl StaticFeed {
    pub fn new(documents: impl IntoIterator<Item = RawDocument>) -> Self {
        Self {
            pending: documents.into_iter().collect(),
        }
    }
}

#[async_trait]
impl DocumentFeed for StaticFeed {
    async fn next_document(&mut self) -> Result<Option<RawDocument>, IngestError> {
        Ok(self.pending.pop_front())
    }
}
