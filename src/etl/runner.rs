use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::etl::dataset::Dataset;
use crate::etl::error::EtlError;
use crate::etl::ingest::{self, IngestionSummary};
use crate::etl::progress::{local_timestamp, Level, ProgressSink};
use crate::etl::{fetch, transform, trigger};

/// Drive one complete ETL run, reporting every step through the sink.
///
/// The final progress event is either the ingestion summary or the first
/// error, after which the stream closes. No step is retried.
pub async fn run(pool: PgPool, caller_auth: String, sink: Arc<dyn ProgressSink>) {
    let client = reqwest::Client::new();

    let outcome = run_pipeline(&pool, &client, &caller_auth, sink.as_ref()).await;
    match outcome {
        Ok(summary) => {
            info!("ETL run finished successfully");
            sink.emit(
                format!("{}: ETL Insertion process finished.", local_timestamp()),
                Level::Success,
            )
            .await;
            match serde_json::to_value(&summary) {
                Ok(result) => sink.close(Some(result)).await,
                Err(e) => {
                    error!("failed to serialize ingestion summary: {}", e);
                    sink.close(None).await;
                }
            }
        }
        Err(e) => {
            error!("ETL run failed: {}", e);
            sink.emit(e.to_string(), Level::Error).await;
            sink.close(None).await;
        }
    }
}

async fn run_pipeline(
    pool: &PgPool,
    client: &reqwest::Client,
    caller_auth: &str,
    sink: &dyn ProgressSink,
) -> Result<IngestionSummary, EtlError> {
    let batches = collect_batches(client, caller_auth, sink).await?;
    ingest::ingest(pool, &batches).await
}

/// Trigger the remote transform, then fetch and convert each artifact in
/// the order the gateway returned them. The batches travel as one owned
/// map through the stages; nothing is shared across runs.
pub async fn collect_batches(
    client: &reqwest::Client,
    caller_auth: &str,
    sink: &dyn ProgressSink,
) -> Result<HashMap<Dataset, String>, EtlError> {
    let locations = trigger::trigger(client).await?;
    sink.emit(
        format!(
            "{}: API Gateway invoked successfully. Downloading {} TSV files from S3...",
            local_timestamp(),
            locations.len()
        ),
        Level::Info,
    )
    .await;

    let mut batches: HashMap<Dataset, String> = HashMap::new();

    for location in &locations {
        let (dataset, artifact) = fetch::fetch(client, location).await?;
        sink.emit(
            format!(
                "{}: retrieved {} payload from S3 ({} bytes).",
                local_timestamp(),
                dataset,
                artifact.len()
            ),
            Level::Info,
        )
        .await;

        let sql = transform::transform(client, dataset, artifact, caller_auth).await?;
        sink.emit(
            format!(
                "{}: generated {} SQL statements for {}.",
                local_timestamp(),
                transform::statement_count(&sql),
                dataset
            ),
            Level::Info,
        )
        .await;

        // Same-key artifacts within one run overwrite; last one wins.
        batches.insert(dataset, sql);
    }

    Ok(batches)
}
