//! Output dataset schema for the downstream vector index.
//!
//! One [`IndexRecord`] is written per successfully embedded chunk. The field
//! names are the wire contract of the index ingestion format and must not
//! drift; the structs exist precisely so that drift fails at compile time
//! instead of at index-build time.

use serde::{Deserialize, Serialize};

use crate::types::{DocumentKind, RawDocument};

/// A single embedded chunk, ready for the vector index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// `"<identifier>_chunk_<globalIndex>"` — unique across the run.
    pub id: String,
    pub embedding: Vec<f32>,
    pub restricts: Vec<Restrict>,
    pub embedding_metadata: EmbeddingMetadata,
}

/// Filter tag consumed by the index at query time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrict {
    pub namespace: String,
    pub allow: Vec<String>,
}

/// Chunk provenance stored alongside the vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMetadata {
    pub original_text: String,
    pub source_file: String,
    pub page_chunk: usize,
}

impl IndexRecord {
    /// Assembles the record for one embedded chunk.
    ///
    /// `global_index` is the chunk's position among all chunks of its source
    /// document, 0-based in split order; it is never reset per batch.
    pub fn from_chunk(
        document: &RawDocument,
        global_index: usize,
        chunk_text: String,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: format!("{}_chunk_{}", document.identifier, global_index),
            embedding,
            restricts: vec![
                Restrict {
                    namespace: "source".to_string(),
                    allow: vec![document.identifier.clone()],
                },
                Restrict {
                    namespace: "type".to_string(),
                    allow: vec![document.kind.as_str().to_string()],
                },
            ],
            embedding_metadata: EmbeddingMetadata {
                original_text: chunk_text,
                source_file: document.identifier.clone(),
                page_chunk: global_index,
            },
        }
    }
}

/// Serializes records as newline-delimited JSON: one object per line, no
/// enclosing array, trailing newline after the last record.
pub fn to_jsonl(records: &[IndexRecord]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}
