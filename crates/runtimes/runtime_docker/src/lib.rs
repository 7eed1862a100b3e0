//! tritonup_runtime_docker - Docker backend
//!
//! Implements the container runtime contract on top of the Docker Engine
//! API via bollard:
//! - name-filtered listing of running containers
//! - image pull when the image is absent locally
//! - create + start with GPU device requests, network mode, shm size
//! - stop + remove

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::{DeviceRequest, HostConfig};
use bollard::Docker;
use futures_util::TryStreamExt;
use tracing::{debug, info};

use tritonup_runtime_api::{
    ContainerHandle, ContainerRuntime, LaunchSpec, RuntimeError, RuntimeResult,
};

/// Graceful shutdown window before docker kills the container.
const STOP_TIMEOUT_SECS: i64 = 30;

/// Docker-backed container runtime.
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using the local daemon defaults (unix socket, or DOCKER_HOST
    /// when set).
    pub fn connect() -> RuntimeResult<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|err| RuntimeError::Connect(err.to_string()))?;
        Ok(Self { docker })
    }

    async fn ensure_image(&self, image: &str) -> RuntimeResult<()> {
        if self.docker.inspect_image(image).await.is_ok() {
            return Ok(());
        }

        info!(image = %image, "Pulling image");
        let options = Some(CreateImageOptions {
            from_image: image.to_string(),
            ..Default::default()
        });
        let mut stream = self.docker.create_image(options, None, None);
        while let Some(_progress) =
            stream
                .try_next()
                .await
                .map_err(|err| RuntimeError::ImagePull {
                    image: image.to_string(),
                    reason: err.to_string(),
                })?
        {}
        Ok(())
    }
}

/// Docker's name filter is a substring match; container names in list
/// responses carry a leading slash.
fn matches_exact(summary_names: &[String], name: &str) -> bool {
    summary_names
        .iter()
        .any(|n| n.trim_start_matches('/') == name)
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn find_by_name(&self, name: &str) -> RuntimeResult<Vec<ContainerHandle>> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![name.to_string()]);
        let options = Some(ListContainersOptions::<String> {
            filters,
            ..Default::default()
        });

        let summaries = self
            .docker
            .list_containers(options)
            .await
            .map_err(|err| RuntimeError::List(err.to_string()))?;

        Ok(summaries
            .into_iter()
            .filter(|summary| {
                matches_exact(summary.names.as_deref().unwrap_or_default(), name)
            })
            .filter_map(|summary| summary.id)
            .map(ContainerHandle::new)
            .collect())
    }

    async fn launch(&self, spec: &LaunchSpec) -> RuntimeResult<ContainerHandle> {
        self.ensure_image(&spec.image).await?;

        let device_requests = spec.gpu.as_ref().map(|gpu| {
            vec![DeviceRequest {
                driver: Some(gpu.driver.clone()),
                device_ids: Some(gpu.device_ids.clone()),
                capabilities: Some(vec![gpu.capabilities.clone()]),
                ..Default::default()
            }]
        });

        let host_config = HostConfig {
            network_mode: Some(spec.network_mode.clone()),
            auto_remove: Some(spec.auto_remove),
            shm_size: Some(spec.shm_size_bytes as i64),
            device_requests,
            ..Default::default()
        };

        let config = Config {
            image: Some(spec.image.clone()),
            cmd: Some(spec.command.clone()),
            host_config: Some(host_config),
            ..Default::default()
        };

        let create = self
            .docker
            .create_container(
                Some(CreateContainerOptions {
                    name: spec.name.clone(),
                    platform: None,
                }),
                config,
            )
            .await
            .map_err(|err| RuntimeError::Create {
                name: spec.name.clone(),
                reason: err.to_string(),
            })?;

        if let Err(err) = self
            .docker
            .start_container(&create.id, None::<StartContainerOptions<String>>)
            .await
        {
            // Created but never started; remove so the name is free again.
            let _ = self
                .docker
                .remove_container(
                    &create.id,
                    Some(RemoveContainerOptions {
                        force: true,
                        ..Default::default()
                    }),
                )
                .await;
            return Err(RuntimeError::Start {
                id: create.id,
                reason: err.to_string(),
            });
        }

        debug!(id = %create.id, name = %spec.name, "Container started");
        Ok(ContainerHandle::new(create.id))
    }

    async fn stop(&self, name: &str) -> RuntimeResult<Option<ContainerHandle>> {
        let existing = self.find_by_name(name).await?;
        let Some(handle) = existing.into_iter().next() else {
            return Ok(None);
        };

        info!(name = %name, short_id = %handle.short_id, "Stopping container");
        self.docker
            .stop_container(
                &handle.id,
                Some(StopContainerOptions {
                    t: STOP_TIMEOUT_SECS,
                }),
            )
            .await
            .map_err(|err| RuntimeError::Stop {
                name: name.to_string(),
                reason: err.to_string(),
            })?;

        // Auto-remove containers clean themselves up; removal of the rest
        // is best-effort.
        let _ = self
            .docker
            .remove_container(
                &handle.id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await;

        Ok(Some(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_strips_leading_slash() {
        let names = vec!["/spark-triton".to_string()];
        assert!(matches_exact(&names, "spark-triton"));
    }

    #[test]
    fn substring_matches_are_rejected() {
        let names = vec!["/spark-triton-2".to_string()];
        assert!(!matches_exact(&names, "spark-triton"));

        let names = vec!["/my-spark-triton".to_string()];
        assert!(!matches_exact(&names, "spark-triton"));
    }

    #[test]
    fn any_alias_may_match() {
        let names = vec!["/alias".to_string(), "/spark-triton".to_string()];
        assert!(matches_exact(&names, "spark-triton"));
        assert!(!matches_exact(&[], "spark-triton"));
    }
}
