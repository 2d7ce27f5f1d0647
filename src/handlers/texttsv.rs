use axum::extract::Path;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::error::ApiError;
use crate::etl::Dataset;
use crate::sqlgen;

/// POST /api/fiscalia/texttsv/:dataset
///
/// Converts a raw TSV body into the INSERT batch for one dataset. The
/// ETL transform proxy is the primary caller, but the endpoint is also
/// usable directly for manual loads.
pub async fn generate_sql(Path(dataset): Path<String>, body: String) -> Result<String, ApiError> {
    info!("received POST to {}/texttsv/{}", API_ADDRESS, dataset);

    let dataset = Dataset::from_name(&dataset)
        .ok_or_else(|| ApiError::not_found(format!("unknown dataset: {}", dataset)))?;

    let sql = sqlgen::generate(dataset, &body).map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(sql)
}
