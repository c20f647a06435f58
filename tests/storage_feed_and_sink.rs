//! Object-store HTTP seams: bucket listing, the document feed's
//! skip-on-failure behavior, and the dataset sink.

use std::io::Write;

use httpmock::prelude::*;
use serde_json::json;
use url::Url;

use docembed::{
    BucketFeed, DatasetSink, DocumentFeed, DocumentKind, GcsClient, IndexRecord, RawDocument,
    SinkOutcome,
};

fn client_for(server: &MockServer) -> GcsClient {
    GcsClient::with_base_url(Url::parse(&server.base_url()).unwrap(), None)
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
    );

    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    buffer.into_inner()
}

#[tokio::test]
async fn listing_follows_pagination() {
    let server = MockServer::start_async().await;

    let first_page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/storage/v1/b/corpus/o")
                .query_param("prefix", "docs/")
                .matches(|req: &HttpMockRequest| {
                    req.query_params.as_ref().is_none_or(|params| {
                        !params.iter().any(|(key, _)| key.as_str() == "pageToken")
                    })
                });
            then.status(200).json_body(json!({
                "items": [{"name": "docs/a.pdf"}, {"name": "docs/b.docx"}],
                "nextPageToken": "page-two"
            }));
        })
        .await;

    let second_page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/storage/v1/b/corpus/o")
                .query_param("prefix", "docs/")
                .query_param("pageToken", "page-two");
            then.status(200).json_body(json!({
                "items": [{"name": "docs/c.pdf"}]
            }));
        })
        .await;

    let names = client_for(&server)
        .list_objects("corpus", "docs/")
        .await
        .unwrap();

    first_page.assert_async().await;
    second_page.assert_async().await;
    assert_eq!(names, vec!["docs/a.pdf", "docs/b.docx", "docs/c.pdf"]);
}

#[tokio::test]
async fn feed_filters_skips_broken_documents_and_extracts_the_rest() {
    let server = MockServer::start_async().await;

    // The listing carries the folder placeholder, an unsupported extension,
    // a document that fails extraction, and two real documents.
    server
        .mock_async(|when, then| {
            when.method(GET).path("/storage/v1/b/corpus/o");
            then.status(200).json_body(json!({
                "items": [
                    {"name": "docs/"},
                    {"name": "docs/notes.txt"},
                    {"name": "docs/broken.docx"},
                    {"name": "docs/report.docx"},
                    {"name": "docs/minutes.DOCX"}
                ]
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("broken.docx");
            then.status(200).body("not a zip archive at all");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("report.docx");
            then.status(200)
                .body(docx_bytes(&["Quarterly report.", "All numbers are up."]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("minutes.DOCX");
            then.status(200).body(docx_bytes(&["Meeting minutes."]));
        })
        .await;

    let mut feed = BucketFeed::connect(client_for(&server), "corpus", "docs/")
        .await
        .unwrap();
    assert_eq!(feed.remaining(), 3, "placeholder and txt are filtered out");

    let first = feed.next_document().await.unwrap().unwrap();
    assert_eq!(first.identifier, "docs/report.docx");
    assert_eq!(first.kind, DocumentKind::Docx);
    assert_eq!(first.text, "Quarterly report.\nAll numbers are up.");

    let second = feed.next_document().await.unwrap().unwrap();
    assert_eq!(second.identifier, "docs/minutes.DOCX");
    assert_eq!(second.text, "Meeting minutes.");

    assert!(feed.next_document().await.unwrap().is_none());
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/storage/v1/b/corpus/o");
            then.status(403).body("permission denied");
        })
        .await;

    let result = BucketFeed::connect(client_for(&server), "corpus", "docs/").await;
    let err = result.err().expect("listing failure must be fatal");
    assert!(err.to_string().contains("permission denied"));
}

fn sample_records() -> Vec<IndexRecord> {
    let document = RawDocument {
        identifier: "a.pdf".to_string(),
        kind: DocumentKind::Pdf,
        text: String::new(),
    };
    vec![
        IndexRecord::from_chunk(&document, 0, "first".to_string(), vec![0.1]),
        IndexRecord::from_chunk(&document, 1, "second".to_string(), vec![0.2]),
    ]
}

#[tokio::test]
async fn sink_uploads_jsonl_in_one_request() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload/storage/v1/b/corpus/o")
                .query_param("uploadType", "media")
                .query_param("name", "embeddings/dataset.json")
                .header("content-type", "application/json")
                .body_contains("a.pdf_chunk_0")
                .body_contains("a.pdf_chunk_1");
            then.status(200).json_body(json!({"name": "embeddings/dataset.json"}));
        })
        .await;

    let sink = DatasetSink::new(client_for(&server), "corpus", "embeddings/dataset.json");
    let outcome = sink.write(&sample_records()).await.unwrap();

    upload.assert_async().await;
    match outcome {
        SinkOutcome::Written {
            object,
            records,
            bytes,
        } => {
            assert_eq!(object, "embeddings/dataset.json");
            assert_eq!(records, 2);
            assert!(bytes > 0);
        }
        SinkOutcome::Empty => panic!("expected a written outcome"),
    }
}

#[tokio::test]
async fn sink_skips_upload_when_there_are_no_records() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload/storage/v1/b/corpus/o");
            then.status(200);
        })
        .await;

    let sink = DatasetSink::new(client_for(&server), "corpus", "embeddings/dataset.json");
    let outcome = sink.write(&[]).await.unwrap();

    assert_eq!(outcome, SinkOutcome::Empty);
    assert_eq!(upload.hits_async().await, 0);
}

#[tokio::test]
async fn upload_failure_is_fatal() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload/storage/v1/b/corpus/o");
            then.status(500).body("backend write failed");
        })
        .await;

    let sink = DatasetSink::new(client_for(&server), "corpus", "embeddings/dataset.json");
    let err = sink.write(&sample_records()).await.unwrap_err();
    assert!(err.to_string().contains("backend write failed"));
}
