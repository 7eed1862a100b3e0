//! tritonup_launcher - ensure-running orchestration
//!
//! The control flow of the tool lives here: existing-instance check,
//! detached GPU launch, fixed startup delay, readiness poll loop. The
//! container runtime and the inference-server client are passed in as
//! trait objects with no hidden global lifecycle, so tests substitute
//! fakes for both.

pub mod client;
pub mod ensure;
pub mod poll;

#[cfg(test)]
pub(crate) mod testutil;

pub use client::{InferenceServer, ProbeError, TritonClient};
pub use ensure::{ensure_running, EnsureOutcome, LaunchError};
pub use poll::{probe, wait_until_ready, Readiness};
