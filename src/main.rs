use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use docembed::{
    BucketFeed, DatasetSink, EmbedPipeline, IngestConfig, IngestError, SinkOutcome, VertexEmbedder,
};

#[tokio::main]
async fn main() -> Result<(), IngestError> {
    init_tracing();

    let config = IngestConfig::from_env()?;

    let storage = docembed::GcsClient::new(config.access_token.clone());
    let mut feed = BucketFeed::connect(storage.clone(), &config.bucket, &config.input_prefix)
        .await
        .inspect_err(|err| tracing::error!(error = %err, "cannot list source bucket"))?;

    let embedder = VertexEmbedder::new(
        &config.project_id,
        &config.location,
        &config.embedding_model,
        config.access_token.clone(),
    )?;

    let pipeline = EmbedPipeline::new(Arc::new(embedder));
    let report = pipeline.run(&mut feed).await?;

    for failure in &report.failures {
        eprintln!(
            "batch failed: {} at offset {}: {}",
            failure.source_file, failure.batch_offset, failure.reason
        );
    }
    println!(
        "processed {} documents, embedded {} chunks ({} batch failures)",
        report.documents_processed,
        report.chunks_embedded,
        report.failures.len()
    );

    let sink = DatasetSink::new(storage, &config.bucket, config.output_object());
    match sink.write(&report.records).await? {
        SinkOutcome::Written {
            object,
            records,
            bytes,
        } => {
            println!(
                "dataset saved to gs://{}/{} ({} records, {} bytes)",
                config.bucket, object, records, bytes
            );
        }
        SinkOutcome::Empty => {
            println!("no data produced, nothing uploaded");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
