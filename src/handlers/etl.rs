use axum::extract::Extension;
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;
use crate::error::ApiError;
use crate::etl::progress::{ProgressSink, SseSink};
use crate::etl::runner;
use crate::middleware::AuthUser;

/// GET /api/fiscalia/admin/raw_data_etl
///
/// Kicks off the full ETL run and streams progress back as SSE. The
/// response starts immediately (headers flushed before any long-running
/// work); the pipeline runs on a spawned task writing into the channel
/// and the stream ends when that task drops its sender.
pub async fn raw_data_etl(
    Extension(auth_user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    info!("received GET to {}/admin/raw_data_etl", API_ADDRESS);

    let pool = database::pool().await?;

    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let sink: Arc<dyn ProgressSink> = Arc::new(SseSink::new(tx));

    // If the caller disconnects mid-run, writes become no-ops but the
    // in-flight transaction runs to completion or failure on its own.
    tokio::spawn(runner::run(pool, auth_user.raw_authorization, sink));

    let stream = UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>);

    Ok((
        [(header::CACHE_CONTROL, "no-cache"), (header::CONNECTION, "keep-alive")],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    ))
}
