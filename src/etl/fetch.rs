use tracing::{debug, error};

use crate::config;
use crate::etl::dataset::Dataset;
use crate::etl::error::EtlError;

/// Download one artifact and resolve which dataset it belongs to.
///
/// The dataset match runs against the location string, not the content,
/// so a remote contract drift (new or renamed output files) fails the run
/// immediately instead of loading mislabeled data.
pub async fn fetch(client: &reqwest::Client, location: &str) -> Result<(Dataset, String), EtlError> {
    let dataset = Dataset::match_location(location).ok_or_else(|| EtlError::UnknownArtifact {
        location: location.to_string(),
    })?;

    debug!("Downloading {} artifact...", dataset);
    let response = client
        .get(location)
        .timeout(config::config().presigned_url_timeout)
        .send()
        .await
        .map_err(|e| {
            error!("artifact download failed: {}", e);
            EtlError::ArtifactDownload {
                location: location.to_string(),
            }
        })?;

    if !response.status().is_success() {
        error!("artifact download returned [{}] for {}", response.status(), location);
        return Err(EtlError::ArtifactDownload {
            location: location.to_string(),
        });
    }

    let body = response.text().await.map_err(|_| EtlError::ArtifactDownload {
        location: location.to_string(),
    })?;

    if body.is_empty() {
        return Err(EtlError::ArtifactDownload {
            location: location.to_string(),
        });
    }

    Ok((dataset, body))
}
