//! Pipeline test for the collect phase: trigger, artifact fetch, and
//! TSV-to-SQL conversion against an in-process stub for the gateway,
//! object storage, and the local conversion endpoints.

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use fiscalia_api::etl::progress::{Level, RecordingSink};
use fiscalia_api::etl::{runner, Dataset};

const CALLER_AUTH: &str = "Bearer integration-test-token";

#[derive(Clone)]
struct StubState {
    base_url: String,
}

async fn gateway(State(state): State<StubState>) -> impl IntoResponse {
    let urls: Vec<String> = Dataset::ALL
        .iter()
        .map(|d| format!("{}/files/2026-02-19_{}.tsv?X-Amz-Expires=300", state.base_url, d.name()))
        .collect();
    (StatusCode::ACCEPTED, Json(json!({ "presigned_urls": urls })))
}

async fn file(Path(name): Path<String>) -> String {
    format!("col_a\tcol_b\n{}\t1\n", name)
}

async fn texttsv(Path(dataset): Path<String>, headers: HeaderMap) -> impl IntoResponse {
    // The proxy must run as the original caller, not a service account.
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
    if auth != Some(CALLER_AUTH) {
        return (StatusCode::UNAUTHORIZED, String::new());
    }
    (
        StatusCode::OK,
        format!("INSERT INTO {} VALUES (1);\nINSERT INTO {} VALUES (2);", dataset, dataset),
    )
}

async fn spawn_stub() -> Result<u16> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let state = StubState {
        base_url: format!("http://127.0.0.1:{}", port),
    };

    let app = Router::new()
        .route(
            "/api/fiscalia/post/raw_data_etl/invoke_lambda/return_tsv_file_urls",
            post(gateway),
        )
        .route("/files/:name", get(file))
        .route("/api/fiscalia/texttsv/:dataset", post(texttsv))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    Ok(port)
}

#[tokio::test]
async fn collects_one_batch_per_dataset_with_ordered_progress() -> Result<()> {
    let port = spawn_stub().await?;

    // Config is resolved once per process; set everything before first use.
    std::env::set_var("API_GW_SECRET_KEY", "stub-gateway-secret");
    std::env::set_var("AWS_API_GATEWAY_ENDPOINT", format!("http://127.0.0.1:{}", port));
    std::env::set_var("HOST_ADDRESS", "127.0.0.1");
    std::env::set_var("BACKEND_PORT", port.to_string());
    std::env::set_var("S3_PRESIGNED_URL_TIMEOUT", "5000");

    let client = reqwest::Client::new();
    let sink = RecordingSink::new();

    let batches = runner::collect_batches(&client, CALLER_AUTH, &sink).await?;

    assert_eq!(batches.len(), 5, "one SQL batch per dataset");
    for dataset in Dataset::ALL {
        let sql = batches.get(&dataset).expect("batch present");
        assert!(sql.contains(&format!("INSERT INTO {}", dataset.name())));
    }

    // One trigger event, then fetch + transform per dataset, in gateway order.
    let events = sink.events();
    assert_eq!(events.len(), 1 + 2 * 5);
    assert!(events[0].message.contains("API Gateway invoked successfully"));
    assert!(events[1].message.contains("variable_expenses"));
    assert!(events[2].message.contains("2 SQL statements"));
    assert!(events.iter().all(|e| e.level == Level::Info));

    Ok(())
}
