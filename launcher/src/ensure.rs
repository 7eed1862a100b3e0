//! The ensure-running flow: check, launch, delay, poll.

use thiserror::Error;
use tokio::time::sleep;
use tracing::info;

use tritonup_core::Config;
use tritonup_runtime_api::{ContainerHandle, ContainerRuntime, LaunchSpec, RuntimeError};

use crate::client::InferenceServer;
use crate::poll::wait_until_ready;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("invalid launch configuration: {0}")]
    Spec(String),

    #[error("server did not become ready within {checks} readiness checks")]
    WaitTimeout { checks: u64 },
}

/// What the ensure flow found or did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Containers with the reserved name were already running
    AlreadyRunning(Vec<ContainerHandle>),
    /// A new container was launched and the server reached readiness
    Launched(ContainerHandle),
}

impl EnsureOutcome {
    /// One-line human summary, printed by the CLI.
    pub fn summary(&self) -> String {
        match self {
            Self::AlreadyRunning(handles) => {
                let short_ids: Vec<&str> =
                    handles.iter().map(|h| h.short_id.as_str()).collect();
                format!(">>>> containers: {:?}", short_ids)
            }
            Self::Launched(handle) => format!(">>>> starting triton: {}", handle.short_id),
        }
    }
}

/// Ensure the named server container is running and ready.
///
/// If a container with the reserved name is already up the runtime is left
/// untouched and no launch is issued. Otherwise a new container is launched
/// from the configured spec, the startup delay elapses, and the readiness
/// loop runs until the server answers ready. Launch errors are fatal;
/// readiness probe errors are not.
pub async fn ensure_running(
    runtime: &dyn ContainerRuntime,
    server: &dyn InferenceServer,
    config: &Config,
) -> Result<EnsureOutcome, LaunchError> {
    let name = &config.server.container_name;

    let existing = runtime.find_by_name(name).await?;
    if !existing.is_empty() {
        info!(name = %name, count = existing.len(), "Server container already running");
        return Ok(EnsureOutcome::AlreadyRunning(existing));
    }

    let spec = LaunchSpec::from_config(config).map_err(|err| LaunchError::Spec(err.to_string()))?;
    let handle = runtime.launch(&spec).await?;
    info!(name = %name, short_id = %handle.short_id, image = %spec.image, "Started server container");

    // Give the server process time to come up before the first probe.
    sleep(config.wait.startup_delay()).await;
    wait_until_ready(server, &config.wait).await?;

    Ok(EnsureOutcome::Launched(handle))
}
