//! Shared document model and the crate-wide error type.

use serde::{Deserialize, Serialize};

use crate::embeddings::EmbeddingError;
use crate::source::extract::ExtractError;

/// File type of a source document, as tagged in the output dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Wire form used in record restricts (`"pdf"` / `"docx"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }

    /// Infers the kind from an object name, case-insensitively.
    ///
    /// Returns `None` for unsupported extensions so callers can filter the
    /// listing down to documents the extractor understands.
    pub fn from_object_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source document after download and text extraction.
///
/// Produced once per storage object by the feed and consumed exactly once by
/// the pipeline. `identifier` is the full object name, which doubles as the
/// `source_file` metadata and the prefix of every record id derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDocument {
    pub identifier: String,
    pub kind: DocumentKind,
    pub text: String,
}

/// Errors surfaced by the ingestion crate.
///
/// Batch-level embedding problems never appear here: the pipeline contains
/// them per batch and reports them in its run summary instead of failing the
/// run. Variants of this enum are reserved for failures that are fatal for
/// the whole run (connectivity, configuration, the final dataset write).
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("extraction failed for {identifier}: {source}")]
    Extraction {
        identifier: String,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
