//! Inference-server client contract and the Triton HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Triton answers 200 here once every model in the repository is loaded.
const READY_PATH: &str = "/v2/health/ready";

/// Per-probe timeout so a hanging connection cannot stall the poll loop.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("server unreachable: {0}")]
    Unreachable(String),
}

/// Readiness query against an inference server.
#[async_trait]
pub trait InferenceServer: Send + Sync {
    /// `Ok(true)` once the server accepts requests, `Ok(false)` while it is
    /// still loading, `Err` when it could not be reached at all.
    async fn server_ready(&self) -> Result<bool, ProbeError>;
}

/// HTTP client for Triton's health API, constructed from a host:port
/// endpoint string.
pub struct TritonClient {
    base_url: String,
    client: Client,
}

impl TritonClient {
    pub fn new(endpoint: &str) -> Self {
        let endpoint = endpoint.trim_start_matches("http://");
        Self {
            base_url: format!("http://{}", endpoint),
            client: Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl InferenceServer for TritonClient {
    async fn server_ready(&self) -> Result<bool, ProbeError> {
        let url = format!("{}{}", self.base_url, READY_PATH);
        match self.client.get(&url).send().await {
            // Triton returns 400 while models are still loading.
            Ok(response) => Ok(response.status().is_success()),
            Err(err) => Err(ProbeError::Unreachable(err.to_string())),
        }
    }
}
