//! tritonup_runtime_api - Container runtime traits and types
//!
//! This crate defines the contract for pluggable container runtimes.
//! The docker backend implements these traits; tests substitute fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tritonup_core::{parse_size, Config};

/// Docker's short id convention.
const SHORT_ID_LEN: usize = 12;

/// Transient descriptor of a running container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHandle {
    /// Full runtime identifier
    pub id: String,
    /// First 12 characters of the id, for user-facing output
    pub short_id: String,
}

impl ContainerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let short_id = id.chars().take(SHORT_ID_LEN).collect();
        Self { id, short_id }
    }
}

/// GPU declaration attached to a launch: which driver, which devices,
/// which capabilities the container requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuRequest {
    pub driver: String,
    pub device_ids: Vec<String>,
    pub capabilities: Vec<String>,
}

impl GpuRequest {
    /// An nvidia request with the `gpu` capability.
    pub fn nvidia(device_ids: Vec<String>) -> Self {
        Self {
            driver: "nvidia".to_string(),
            device_ids,
            capabilities: vec!["gpu".to_string()],
        }
    }
}

/// Everything a runtime needs to create and start a detached container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub image: String,
    pub command: Vec<String>,
    pub name: String,
    pub network_mode: String,
    pub shm_size_bytes: u64,
    pub auto_remove: bool,
    pub gpu: Option<GpuRequest>,
}

impl LaunchSpec {
    /// Build the launch spec for the configured server container.
    pub fn from_config(config: &Config) -> Result<Self> {
        let shm_size_bytes = parse_size(&config.runtime.shm_size)?;
        let gpu = if config.runtime.gpu_device_ids.is_empty() {
            None
        } else {
            Some(GpuRequest::nvidia(config.runtime.gpu_device_ids.clone()))
        };
        Ok(Self {
            image: config.server.image.clone(),
            command: config.server.command(),
            name: config.server.container_name.clone(),
            network_mode: config.runtime.network_mode.clone(),
            shm_size_bytes,
            auto_remove: config.runtime.auto_remove,
            gpu,
        })
    }
}

/// Errors from container runtime operations. Launch-time errors are typed
/// but not retried; callers treat them as fatal.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to connect to container runtime: {0}")]
    Connect(String),

    #[error("failed to list containers: {0}")]
    List(String),

    #[error("failed to pull image {image}: {reason}")]
    ImagePull { image: String, reason: String },

    #[error("failed to create container {name}: {reason}")]
    Create { name: String, reason: String },

    #[error("failed to start container {id}: {reason}")]
    Start { id: String, reason: String },

    #[error("failed to stop container {name}: {reason}")]
    Stop { name: String, reason: String },
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// The main trait that container runtime backends must implement.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Running containers whose name matches `name` exactly. Read-only and
    /// idempotent.
    async fn find_by_name(&self, name: &str) -> RuntimeResult<Vec<ContainerHandle>>;

    /// Create and start a detached container. Returns once the container
    /// process has been started, not when the workload is ready.
    async fn launch(&self, spec: &LaunchSpec) -> RuntimeResult<ContainerHandle>;

    /// Stop and remove the named container. Returns `None` if no container
    /// with that name is running.
    async fn stop(&self, name: &str) -> RuntimeResult<Option<ContainerHandle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_is_twelve_chars() {
        let handle = ContainerHandle::new("abc123def456789012345678");
        assert_eq!(handle.short_id, "abc123def456");
        assert_eq!(handle.id, "abc123def456789012345678");
    }

    #[test]
    fn short_id_of_short_input_is_whole_input() {
        let handle = ContainerHandle::new("abc123");
        assert_eq!(handle.short_id, "abc123");
    }

    #[test]
    fn nvidia_request_carries_gpu_capability() {
        let gpu = GpuRequest::nvidia(vec!["0".to_string()]);
        assert_eq!(gpu.driver, "nvidia");
        assert_eq!(gpu.device_ids, vec!["0".to_string()]);
        assert_eq!(gpu.capabilities, vec!["gpu".to_string()]);
    }

    #[test]
    fn spec_from_default_config() {
        let config = Config::default();
        let spec = LaunchSpec::from_config(&config).unwrap();
        assert_eq!(spec.image, "nvcr.io/nvidia/tritonserver:24.08-py3");
        assert_eq!(spec.command, vec!["tritonserver", "--model-repository=/models"]);
        assert_eq!(spec.name, "spark-triton");
        assert_eq!(spec.network_mode, "host");
        assert_eq!(spec.shm_size_bytes, 64 * 1024 * 1024);
        assert!(spec.auto_remove);
        assert_eq!(spec.gpu, Some(GpuRequest::nvidia(vec!["0".to_string()])));
    }

    #[test]
    fn no_device_ids_means_no_gpu_request() {
        let mut config = Config::default();
        config.runtime.gpu_device_ids.clear();
        let spec = LaunchSpec::from_config(&config).unwrap();
        assert_eq!(spec.gpu, None);
    }

    #[test]
    fn bad_shm_size_is_rejected() {
        let mut config = Config::default();
        config.runtime.shm_size = "lots".to_string();
        assert!(LaunchSpec::from_config(&config).is_err());
    }
}
