//! Minimal Cloud Storage JSON-API client.
//!
//! Covers the three operations the pipeline needs — paginated listing,
//! whole-object download, and single-request upload. The base URL is
//! injectable so tests can point the client at a local mock server.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::types::IngestError;

const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";

/// HTTP client for bucket listing, object download, and object upload.
#[derive(Clone, Debug)]
pub struct GcsClient {
    http: Client,
    base_url: Url,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<ObjectEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ObjectEntry {
    name: String,
}

impl GcsClient {
    /// Client against the public Cloud Storage endpoint.
    ///
    /// `access_token` is a resolved OAuth bearer token; `None` works for
    /// public buckets and emulators.
    pub fn new(access_token: Option<String>) -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base url is valid");
        Self::with_base_url(base_url, access_token)
    }

    /// Client against an explicit endpoint (tests, emulators).
    pub fn with_base_url(base_url: Url, access_token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            access_token,
        }
    }

    /// Lists object names under `prefix`, following pagination to the end.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<String>, IngestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IngestError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["storage", "v1", "b", bucket, "o"]);

        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.http.get(url.clone()).query(&[("prefix", prefix)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let response = self.authorized(request).send().await?;
            let response = Self::check_status(response, "list objects", bucket).await?;
            let page: ListResponse = response.json().await?;

            names.extend(page.items.into_iter().map(|entry| entry.name));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(names)
    }

    /// Downloads the full contents of one object.
    pub async fn download(&self, bucket: &str, object: &str) -> Result<Vec<u8>, IngestError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| IngestError::Url(self.base_url.to_string()))?;
            segments.pop_if_empty();
            segments.extend(["storage", "v1", "b", bucket, "o"]);
            // push() percent-encodes the object name, slashes included.
            segments.push(object);
        }
        url.set_query(Some("alt=media"));

        let response = self.authorized(self.http.get(url)).send().await?;
        let response = Self::check_status(response, "download", object).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Uploads `body` as a single object in one request.
    pub async fn upload(
        &self,
        bucket: &str,
        object: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), IngestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IngestError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["upload", "storage", "v1", "b", bucket, "o"]);
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", object);

        let request = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        let response = self.authorized(request).send().await?;
        Self::check_status(response, "upload", object).await?;
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(
        response: reqwest::Response,
        operation: &str,
        subject: &str,
    ) -> Result<reqwest::Response, IngestError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(IngestError::Storage(format!(
            "{operation} failed for {subject}: status {status}: {body}"
        )))
    }
}
