//! The TSV conversion endpoint through the real auth middleware:
//! valid tokens get generated SQL back, everything else is rejected.

use anyhow::Result;
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;

use fiscalia_api::handlers::texttsv;
use fiscalia_api::middleware::auth::Claims;
use fiscalia_api::middleware::jwt_auth_middleware;

const SECRET: &str = "integration-test-secret";

fn token() -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        username: "herkuran".to_string(),
        iat: now,
        exp: now + 3600,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )?)
}

async fn spawn_app() -> Result<String> {
    std::env::set_var("JWT_SECRET", SECRET);

    let app = Router::new()
        .route("/api/fiscalia/texttsv/:dataset", post(texttsv::generate_sql))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://127.0.0.1:{}", listener.local_addr()?.port());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    Ok(base)
}

#[tokio::test]
async fn generates_sql_for_authenticated_tsv_upload() -> Result<()> {
    let base = spawn_app().await?;
    let client = reqwest::Client::new();

    let tsv = "description\tincome_type\tmonthly_interval\tvalue\teffective_date\texpiration_date\n\
               Salary\tnet salary\t1\t2400\t2026-01-01\t4000-01-01\n";

    let res = client
        .post(format!("{}/api/fiscalia/texttsv/income", base))
        .header("Authorization", format!("Bearer {}", token()?))
        .header("Content-Type", "text/plain")
        .body(tsv)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let sql = res.text().await?;
    assert!(sql.starts_with("INSERT INTO fixed_income"));
    assert!(sql.contains("'Salary'"));

    Ok(())
}

#[tokio::test]
async fn rejects_missing_and_malformed_tokens() -> Result<()> {
    let base = spawn_app().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/fiscalia/texttsv/income", base))
        .body("whatever")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/fiscalia/texttsv/income", base))
        .header("Authorization", "Bearer not.a.jwt")
        .body("whatever")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn rejects_unknown_dataset_and_bad_tsv() -> Result<()> {
    let base = spawn_app().await?;
    let client = reqwest::Client::new();
    let auth = format!("Bearer {}", token()?);

    let res = client
        .post(format!("{}/api/fiscalia/texttsv/foo_data", base))
        .header("Authorization", &auth)
        .body("a\tb\n1\t2\n")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(format!("{}/api/fiscalia/texttsv/investments", base))
        .header("Authorization", &auth)
        .body("wrong\theader\n1\t2\n")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
