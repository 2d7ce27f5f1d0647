use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Base path every API route hangs off of.
pub const API_ADDRESS: &str = "/api/fiscalia";

/// Runtime configuration, resolved once from the environment at startup.
///
/// `DATABASE_URL` is read separately by the pool manager; everything else
/// the server needs lives here. The API gateway secret is optional at
/// startup and only required when the ETL trigger endpoint is hit.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_port: u16,
    pub host_address: String,
    pub jwt_secret: String,
    pub api_gw_secret_key: Option<String>,
    pub aws_api_gateway_endpoint: String,
    pub gateway_timeout: Duration,
    pub presigned_url_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let backend_port = env::var("BACKEND_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3002);

        let host_address = env::var("HOST_ADDRESS").unwrap_or_else(|_| "localhost".to_string());

        // millisecond granularity so slow object storage can be tuned per deployment
        let presigned_url_timeout = env::var("S3_PRESIGNED_URL_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(15_000));

        Self {
            backend_port,
            host_address,
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            api_gw_secret_key: env::var("API_GW_SECRET_KEY").ok().filter(|s| !s.is_empty()),
            aws_api_gateway_endpoint: env::var("AWS_API_GATEWAY_ENDPOINT").unwrap_or_default(),
            gateway_timeout: Duration::from_secs(10),
            presigned_url_timeout,
        }
    }

    /// Address of this server as seen by its own outbound sub-requests,
    /// e.g. `http://localhost:3002/api/fiscalia`.
    pub fn local_api_base(&self) -> String {
        format!("http://{}:{}{}", self.host_address, self.backend_port, API_ADDRESS)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
