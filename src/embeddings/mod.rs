//! Embedding providers and the request intent vocabulary.
//!
//! The pipeline talks to embedding backends through [`EmbeddingProvider`], a
//! batch-oriented trait: one call embeds an ordered batch of texts and
//! returns one vector per input, in input order. Implementations enforce the
//! count/order invariant themselves so callers can zip vectors back onto
//! their inputs by position.
//!
//! [`VertexEmbedder`] is the production backend; [`MockEmbeddingProvider`]
//! produces deterministic vectors for tests and offline runs.

mod mock;
mod vertex;

use async_trait::async_trait;

pub use mock::MockEmbeddingProvider;
pub use vertex::VertexEmbedder;

/// Embedding intent, forwarded to the service with every input.
///
/// Retrieval-document and retrieval-query embeddings are geometrically
/// different spaces for some models; ingestion must tag every chunk with
/// [`EmbeddingIntent::RetrievalDocument`] and use the matching query intent
/// at search time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingIntent {
    RetrievalDocument,
    RetrievalQuery,
}

impl EmbeddingIntent {
    /// Wire form expected by the embedding service.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingIntent::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            EmbeddingIntent::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

/// Errors from a single embedding batch call.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("embedding service returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("embedding count mismatch: sent {sent} inputs, received {received} vectors")]
    CountMismatch { sent: usize, received: usize },

    #[error("invalid embedding endpoint: {0}")]
    Endpoint(String),
}

/// Batch embedding backend.
///
/// Contract: on success the returned vector count equals the input count and
/// `result[j]` embeds `inputs[j]`. No partial-batch success exists; any
/// failure fails the whole call.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(
        &self,
        inputs: &[String],
        intent: EmbeddingIntent,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
