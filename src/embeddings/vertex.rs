//! Vertex AI text-embedding client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{EmbeddingError, EmbeddingIntent, EmbeddingProvider};

/// Client for the Vertex AI `:predict` text-embedding endpoint.
///
/// One call embeds one ordered batch; the service returns one prediction per
/// instance, in request order, or fails the batch as a whole. The response
/// count is verified against the request count before vectors are handed
/// back, so a malformed response surfaces as [`EmbeddingError::CountMismatch`]
/// instead of silently misaligned records.
#[derive(Clone, Debug)]
pub struct VertexEmbedder {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl VertexEmbedder {
    /// Builds a client for a published Google embedding model.
    pub fn new(
        project_id: &str,
        location: &str,
        model: &str,
        access_token: Option<String>,
    ) -> Result<Self, EmbeddingError> {
        let endpoint = format!(
            "https://{location}-aiplatform.googleapis.com/v1/projects/{project_id}/locations/{location}/publishers/google/models/{model}:predict"
        );
        let endpoint = Url::parse(&endpoint)
            .map_err(|err| EmbeddingError::Endpoint(format!("{endpoint}: {err}")))?;
        Ok(Self::with_endpoint(endpoint, access_token))
    }

    /// Builds a client against an explicit endpoint (tests, proxies).
    pub fn with_endpoint(endpoint: Url, access_token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            access_token,
        }
    }

    /// The resolved predict endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EmbeddingProvider for VertexEmbedder {
    async fn embed_batch(
        &self,
        inputs: &[String],
        intent: EmbeddingIntent,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = PredictRequest {
            instances: inputs
                .iter()
                .map(|content| Instance {
                    content,
                    task_type: intent.as_str(),
                })
                .collect(),
        };

        let mut request = self.http.post(self.endpoint.clone()).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PredictResponse = response.json().await?;
        if parsed.predictions.len() != inputs.len() {
            return Err(EmbeddingError::CountMismatch {
                sent: inputs.len(),
                received: parsed.predictions.len(),
            });
        }

        Ok(parsed
            .predictions
            .into_iter()
            .map(|prediction| prediction.embeddings.values)
            .collect())
    }
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: Vec<Instance<'a>>,
}

#[derive(Serialize)]
struct Instance<'a> {
    content: &'a str,
    task_type: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    embeddings: PredictionEmbeddings,
}

#[derive(Deserialize)]
struct PredictionEmbeddings {
    values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_derived_from_project_location_and_model() {
        let embedder =
            VertexEmbedder::new("acme-docs", "us-central1", "text-embedding-005", None).unwrap();
        assert_eq!(
            embedder.endpoint().as_str(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/acme-docs/locations/us-central1/publishers/google/models/text-embedding-005:predict"
        );
    }

    #[test]
    fn request_body_carries_content_and_task_type() {
        let body = PredictRequest {
            instances: vec![Instance {
                content: "some chunk",
                task_type: EmbeddingIntent::RetrievalDocument.as_str(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["instances"][0]["content"], "some chunk");
        assert_eq!(json["instances"][0]["task_type"], "RETRIEVAL_DOCUMENT");
    }
}
