//! Batch document ingestion for vector search.
//!
//! ```text
//! Bucket listing ──► source::BucketFeed ──► RawDocument (lazy, one pass)
//!                                               │
//!                     splitter::RecursiveSplitter (600 chars, 60 overlap)
//!                                               │
//!                     pipeline::EmbedPipeline ──► batches of ≤ 100 chunks
//!                                               │        │
//!                               embeddings::VertexEmbedder (per batch)
//!                                               │
//!                          dataset::IndexRecord (id, vector, restricts)
//!                                               │
//!                     sink::DatasetSink ──► JSONL object in the bucket
//! ```
//!
//! A failed embedding batch is reported and dropped; the run continues with
//! the next batch and document. Only a listing failure at startup or the
//! final dataset upload can fail the run as a whole.

pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod splitter;
pub mod storage;
pub mod types;

pub use config::IngestConfig;
pub use dataset::{EmbeddingMetadata, IndexRecord, Restrict};
pub use embeddings::{
    EmbeddingError, EmbeddingIntent, EmbeddingProvider, MockEmbeddingProvider, VertexEmbedder,
};
pub use pipeline::{BatchFailure, EmbedPipeline, PipelineReport};
pub use sink::{DatasetSink, SinkOutcome};
pub use source::{BucketFeed, DocumentFeed, StaticFeed};
pub use splitter::RecursiveSplitter;
pub use storage::GcsClient;
pub use types::{DocumentKind, IngestError, RawDocument};
