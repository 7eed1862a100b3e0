//! Readiness poll loop.
//!
//! Two states: NOT_READY (initial) and READY (terminal). Each iteration
//! folds the probe result into a typed trichotomy instead of discarding
//! error detail, then sleeps the delay configured for that branch.

use tokio::time::sleep;
use tracing::debug;

use tritonup_core::WaitConfig;

use crate::client::{InferenceServer, ProbeError};
use crate::ensure::LaunchError;

/// Outcome of a single readiness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Server answered and accepts requests
    Ready,
    /// Server answered but is still loading models
    NotReady,
    /// Server could not be reached (not listening yet, connection refused)
    Unreachable(String),
}

/// Run one probe and classify the result.
pub async fn probe(server: &dyn InferenceServer) -> Readiness {
    match server.server_ready().await {
        Ok(true) => Readiness::Ready,
        Ok(false) => Readiness::NotReady,
        Err(ProbeError::Unreachable(reason)) => Readiness::Unreachable(reason),
    }
}

/// Poll the server until it reports ready.
///
/// Probe errors never propagate out of the loop; an unreachable server is
/// treated as "not yet ready" and retried after `retry_delay`. A reachable
/// but still-loading server is retried after `not_ready_delay`. With
/// `max_checks` unset the loop runs until readiness is observed or the
/// process is terminated externally.
pub async fn wait_until_ready(
    server: &dyn InferenceServer,
    wait: &WaitConfig,
) -> Result<(), LaunchError> {
    let mut checks: u64 = 0;
    loop {
        if let Some(max) = wait.max_checks {
            if checks >= max {
                return Err(LaunchError::WaitTimeout { checks });
            }
        }
        checks += 1;

        match probe(server).await {
            Readiness::Ready => {
                debug!(checks, "Server ready");
                return Ok(());
            }
            Readiness::NotReady => {
                debug!(checks, "Server answered but is not ready yet");
                sleep(wait.not_ready_delay()).await;
            }
            Readiness::Unreachable(reason) => {
                debug!(checks, reason = %reason, "Server unreachable, retrying");
                sleep(wait.retry_delay()).await;
            }
        }
    }
}
