use anyhow::Result;

use tritonup_core::Config;
use tritonup_runtime_api::ContainerRuntime;
use tritonup_runtime_docker::DockerRuntime;

pub async fn execute() -> Result<()> {
    let config = Config::load()?;
    let runtime = DockerRuntime::connect()?;

    match runtime.stop(&config.server.container_name).await? {
        Some(handle) => {
            println!("Stopped container {}", handle.short_id);
        }
        None => {
            println!(
                "Container '{}' is not running",
                config.server.container_name
            );
        }
    }

    Ok(())
}
