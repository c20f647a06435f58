//! Environment-backed run configuration.
//!
//! The pipeline's core components receive already-resolved values; only this
//! module and the binary touch the process environment. A `.env` file is
//! honored when present.

use std::env;

use crate::types::IngestError;

/// Resolved configuration for one ingestion run.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Cloud project that hosts the embedding model.
    pub project_id: String,
    /// Region of the embedding endpoint.
    pub location: String,
    /// Bucket holding both source documents and the output dataset.
    pub bucket: String,
    /// Object-name prefix under which source documents live.
    pub input_prefix: String,
    /// Object-name prefix for the output dataset.
    pub output_prefix: String,
    /// File name of the output dataset object.
    pub output_file: String,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Resolved OAuth bearer token; `None` for public/emulated storage.
    pub access_token: Option<String>,
}

impl IngestConfig {
    /// Loads configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, IngestError> {
        dotenvy::dotenv().ok();
        Ok(Self {
            project_id: require("PROJECT_ID")?,
            location: require("LOCATION")?,
            bucket: require("BUCKET_NAME")?,
            input_prefix: require("FOLDER_NAME")?,
            output_prefix: require("EMBEDDINGS_FOLDER")?,
            output_file: require("FILE_EMBEDDINGS")?,
            embedding_model: require("MODEL")?,
            access_token: env::var("GOOGLE_ACCESS_TOKEN").ok(),
        })
    }

    /// Full object name of the output dataset.
    pub fn output_object(&self) -> String {
        format!("{}{}", self.output_prefix, self.output_file)
    }
}

fn require(key: &str) -> Result<String, IngestError> {
    env::var(key)
        .map_err(|_| IngestError::Config(format!("missing required environment variable {key}")))
}
