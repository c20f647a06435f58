//! Chunk-and-embed pipeline: the batching core of the crate.
//!
//! ```text
//! DocumentFeed ──► RecursiveSplitter ──► batches of ≤ batch_size chunks
//!                                              │
//!                                              ▼ one request per batch
//!                                      EmbeddingProvider
//!                                              │
//!                     success ── zip by position ──► IndexRecord
//!                     failure ── BatchFailure, batch dropped, run continues
//! ```
//!
//! Execution is strictly sequential: one document at a time, one batch at a
//! time, each embedding call awaited before the next is issued. Network
//! round-trips dominate the cost; batching exists to amortize per-request
//! overhead, not to add concurrency.

use std::sync::Arc;

use crate::dataset::IndexRecord;
use crate::embeddings::{EmbeddingIntent, EmbeddingProvider};
use crate::source::DocumentFeed;
use crate::splitter::RecursiveSplitter;
use crate::types::{IngestError, RawDocument};

const DEFAULT_BATCH_SIZE: usize = 100;

/// One failed embedding batch, identified the way operators need to find it:
/// by document and by the offset of the batch's first chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchFailure {
    pub source_file: String,
    pub batch_offset: usize,
    pub reason: String,
}

/// Outcome of a pipeline run.
///
/// Records are in document-then-chunk order. Failures never abort the run;
/// they are collected here so the caller can summarize them after the fact.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub records: Vec<IndexRecord>,
    pub failures: Vec<BatchFailure>,
    pub documents_processed: usize,
    pub chunks_embedded: usize,
}

impl PipelineReport {
    /// `true` when at least one batch failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Drives documents through splitting, batched embedding, and record
/// assembly.
pub struct EmbedPipeline {
    provider: Arc<dyn EmbeddingProvider>,
    splitter: RecursiveSplitter,
    batch_size: usize,
}

impl EmbedPipeline {
    /// Pipeline with the default splitter (600/60) and batch size (100).
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            splitter: RecursiveSplitter::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Overrides the number of chunks submitted per embedding request.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        self.batch_size = batch_size;
        self
    }

    /// Overrides the splitter configuration.
    #[must_use]
    pub fn with_splitter(mut self, splitter: RecursiveSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Consumes the feed and returns the accumulated run report.
    ///
    /// Only feed-fatal errors propagate; embedding failures are contained
    /// per batch and reported in the result.
    pub async fn run(&self, feed: &mut dyn DocumentFeed) -> Result<PipelineReport, IngestError> {
        let mut report = PipelineReport::default();
        while let Some(document) = feed.next_document().await? {
            tracing::info!(document = %document.identifier, "processing document");
            self.embed_document(&document, &mut report).await;
            report.documents_processed += 1;
        }
        Ok(report)
    }

    async fn embed_document(&self, document: &RawDocument, report: &mut PipelineReport) {
        let chunks = self.splitter.split(&document.text);
        if chunks.is_empty() {
            // Legitimately empty document, not an error.
            return;
        }

        let mut batch_start = 0usize;
        while batch_start < chunks.len() {
            let batch_end = (batch_start + self.batch_size).min(chunks.len());
            let batch = &chunks[batch_start..batch_end];

            match self
                .provider
                .embed_batch(batch, EmbeddingIntent::RetrievalDocument)
                .await
            {
                Ok(vectors) if vectors.len() != batch.len() => {
                    self.record_failure(
                        report,
                        document,
                        batch_start,
                        format!(
                            "expected {} vectors, received {}",
                            batch.len(),
                            vectors.len()
                        ),
                    );
                }
                Ok(vectors) => {
                    for (batch_local, (chunk, embedding)) in
                        batch.iter().zip(vectors.into_iter()).enumerate()
                    {
                        report.records.push(IndexRecord::from_chunk(
                            document,
                            batch_start + batch_local,
                            chunk.clone(),
                            embedding,
                        ));
                    }
                    report.chunks_embedded += batch.len();
                }
                Err(err) => {
                    self.record_failure(report, document, batch_start, err.to_string());
                }
            }

            batch_start = batch_end;
        }
    }

    fn record_failure(
        &self,
        report: &mut PipelineReport,
        document: &RawDocument,
        batch_offset: usize,
        reason: String,
    ) {
        tracing::warn!(
            document = %document.identifier,
            batch_offset,
            reason = %reason,
            "embedding batch failed, dropping its records"
        );
        report.failures.push(BatchFailure {
            source_file: document.identifier.clone(),
            batch_offset,
            reason,
        });
    }
}
