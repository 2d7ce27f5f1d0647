//! Contract-drift scenario: the gateway hands back an artifact whose
//! location matches none of the known datasets. The run must stop before
//! any ingestion work, naming the offending location.

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use fiscalia_api::etl::progress::RecordingSink;
use fiscalia_api::etl::{runner, EtlError};

#[derive(Clone)]
struct StubState {
    base_url: String,
}

async fn gateway(State(state): State<StubState>) -> impl IntoResponse {
    let urls = vec![
        format!("{}/files/2026-02-19_fixed_costs.tsv", state.base_url),
        format!("{}/files/2026-02-19_foo_data.tsv", state.base_url),
    ];
    (StatusCode::ACCEPTED, Json(json!({ "presigned_urls": urls })))
}

async fn file(Path(name): Path<String>) -> String {
    format!("col_a\tcol_b\n{}\t1\n", name)
}

async fn texttsv(Path(dataset): Path<String>) -> String {
    format!("INSERT INTO {} VALUES (1);", dataset)
}

#[tokio::test]
async fn unknown_artifact_stops_the_run_before_ingestion() -> Result<()> {
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

    std::env::set_var("API_GW_SECRET_KEY", "stub-gateway-secret");
    std::env::set_var("AWS_API_GATEWAY_ENDPOINT", format!("http://127.0.0.1:{}", port));
    std::env::set_var("HOST_ADDRESS", "127.0.0.1");
    std::env::set_var("BACKEND_PORT", port.to_string());

    let client = reqwest::Client::new();
    let sink = RecordingSink::new();

    let result = runner::collect_batches(&client, "Bearer token", &sink).await;

    match result {
        Err(EtlError::UnknownArtifact { location }) => {
            assert!(location.contains("foo_data"), "error names the bad artifact: {}", location);
        }
        other => panic!("expected UnknownArtifact, got {:?}", other.map(|m| m.len())),
    }

    // Progress stopped exactly where the pipeline did: trigger, then the
    // fixed_costs fetch and transform, nothing for foo_data.
    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert!(events[0].message.contains("API Gateway invoked successfully"));
    assert!(events[1].message.contains("fixed_costs"));
    assert!(events[2].message.contains("fixed_costs"));

    Ok(())
}
