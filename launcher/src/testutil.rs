//! Fakes shared by the launcher unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use tritonup_runtime_api::{
    ContainerHandle, ContainerRuntime, LaunchSpec, RuntimeError, RuntimeResult,
};

use crate::client::{InferenceServer, ProbeError};

/// Serves a scripted sequence of probe results, then stays ready.
pub struct ScriptedServer {
    responses: Mutex<VecDeque<Result<bool, ProbeError>>>,
    pub calls: Mutex<u64>,
}

impl ScriptedServer {
    pub fn new(responses: Vec<Result<bool, ProbeError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn always_ready() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl InferenceServer for ScriptedServer {
    async fn server_ready(&self) -> Result<bool, ProbeError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(true))
    }
}

pub fn unreachable() -> Result<bool, ProbeError> {
    Err(ProbeError::Unreachable("connection refused".to_string()))
}

/// In-memory runtime that records launch and stop calls.
pub struct FakeRuntime {
    pub existing: Vec<ContainerHandle>,
    pub launches: Mutex<Vec<LaunchSpec>>,
    pub fail_launch: bool,
}

impl FakeRuntime {
    pub fn empty() -> Self {
        Self {
            existing: Vec::new(),
            launches: Mutex::new(Vec::new()),
            fail_launch: false,
        }
    }

    pub fn with_running(ids: &[&str]) -> Self {
        Self {
            existing: ids.iter().map(|id| ContainerHandle::new(*id)).collect(),
            launches: Mutex::new(Vec::new()),
            fail_launch: false,
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn find_by_name(&self, _name: &str) -> RuntimeResult<Vec<ContainerHandle>> {
        Ok(self.existing.clone())
    }

    async fn launch(&self, spec: &LaunchSpec) -> RuntimeResult<ContainerHandle> {
        if self.fail_launch {
            return Err(RuntimeError::Create {
                name: spec.name.clone(),
                reason: "name already in use".to_string(),
            });
        }
        self.launches.lock().unwrap().push(spec.clone());
        Ok(ContainerHandle::new("deadbeefcafe0123456789ab"))
    }

    async fn stop(&self, _name: &str) -> RuntimeResult<Option<ContainerHandle>> {
        Ok(self.existing.first().cloned())
    }
}
