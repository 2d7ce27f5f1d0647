use tracing::{debug, error};

use crate::config;
use crate::etl::dataset::Dataset;
use crate::etl::error::EtlError;

/// Convert one fetched artifact into its SQL batch via the local
/// conversion endpoint for that dataset.
///
/// The original caller's Authorization header is forwarded verbatim, so
/// the sub-request runs as the same principal instead of a service
/// account. A 200 with non-empty text body is the only success shape.
pub async fn transform(
    client: &reqwest::Client,
    dataset: Dataset,
    artifact: String,
    caller_auth: &str,
) -> Result<String, EtlError> {
    let route = format!("{}{}", config::config().local_api_base(), dataset.texttsv_path());

    debug!("Generating SQL statements for {} via {}", dataset, route);
    let response = client
        .post(&route)
        .header("Authorization", caller_auth)
        .header("Content-Type", "text/plain")
        .body(artifact)
        .send()
        .await
        .map_err(|e| {
            error!("transform sub-request failed: {}", e);
            EtlError::TransformProxy { route: route.clone() }
        })?;

    if response.status() != reqwest::StatusCode::OK {
        error!("transform endpoint returned [{}] for {}", response.status(), route);
        return Err(EtlError::TransformProxy { route });
    }

    let sql = response
        .text()
        .await
        .map_err(|_| EtlError::TransformProxy { route: route.clone() })?;

    if sql.is_empty() {
        return Err(EtlError::TransformProxy { route });
    }

    Ok(sql)
}

/// Count the statements in a generated batch, for progress reporting.
/// The full batch is never echoed into an event.
pub fn statement_count(sql: &str) -> usize {
    sql.lines().filter(|line| !line.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_nonempty_lines_as_statements() {
        let sql = "INSERT INTO a VALUES (1);\n\nINSERT INTO a VALUES (2);\n";
        assert_eq!(statement_count(sql), 2);
    }

    #[test]
    fn empty_batch_has_zero_statements() {
        assert_eq!(statement_count("\n\n"), 0);
    }
}
