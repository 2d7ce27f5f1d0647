use serde::Deserialize;
use tracing::{debug, error};

use crate::config;
use crate::etl::error::EtlError;

/// Route on the API gateway that invokes the serverless raw-data transform.
const GATEWAY_ROUTE: &str = "/api/fiscalia/post/raw_data_etl/invoke_lambda/return_tsv_file_urls";

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    presigned_urls: Vec<String>,
}

/// Invoke the remote transform and return the artifact locations it produced.
///
/// Fails fast on a missing gateway secret, before any network call. The
/// gateway must answer 202 with a non-empty `presigned_urls` list; any
/// other shape is a trigger error with status and body preserved.
pub async fn trigger(client: &reqwest::Client) -> Result<Vec<String>, EtlError> {
    let config = config::config();

    let secret = config.api_gw_secret_key.as_deref().ok_or(EtlError::Config)?;
    let endpoint = format!("{}{}", config.aws_api_gateway_endpoint, GATEWAY_ROUTE);

    debug!("Invoking {} to start ETL...", endpoint);
    let response = client
        .post(&endpoint)
        .header("Authorization", secret)
        .header("Content-Type", "application/json")
        .timeout(config.gateway_timeout)
        .send()
        .await
        .map_err(|e| {
            error!("API Gateway request failed: {}", e);
            EtlError::trigger_failure(e.status(), String::new(), e.to_string())
        })?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status != reqwest::StatusCode::ACCEPTED {
        error!("API Gateway returned [{}]: {}", status, body);
        return Err(EtlError::trigger_failure(
            Some(status),
            body,
            "API Gateway invocation did not return expected data.".to_string(),
        ));
    }

    let parsed: GatewayResponse = serde_json::from_str(&body).map_err(|e| {
        EtlError::trigger_failure(Some(status), body.clone(), format!("unparseable gateway payload: {}", e))
    })?;

    if parsed.presigned_urls.is_empty() {
        return Err(EtlError::trigger_failure(
            Some(status),
            body,
            "API Gateway response does not include s3 presigned_urls.".to_string(),
        ));
    }

    Ok(parsed.presigned_urls)
}
