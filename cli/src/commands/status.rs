use anyhow::Result;

use tritonup_core::Config;
use tritonup_launcher::{probe, Readiness, TritonClient};
use tritonup_runtime_api::ContainerRuntime;
use tritonup_runtime_docker::DockerRuntime;

pub async fn execute() -> Result<()> {
    let config = Config::load()?;
    println!("tritonup status\n");

    let runtime = DockerRuntime::connect()?;
    let existing = runtime.find_by_name(&config.server.container_name).await?;

    if existing.is_empty() {
        println!("Container '{}': not running", config.server.container_name);
        println!("\nRun `tritonup up` to start the server.");
        return Ok(());
    }

    let short_ids: Vec<&str> = existing.iter().map(|h| h.short_id.as_str()).collect();
    println!(
        "Container '{}': running {:?}",
        config.server.container_name, short_ids
    );

    let server = TritonClient::new(&config.server.endpoint);
    match probe(&server).await {
        Readiness::Ready => {
            println!("Server at {}: ready", config.server.endpoint);
        }
        Readiness::NotReady => {
            println!(
                "Server at {}: not ready (still loading models)",
                config.server.endpoint
            );
        }
        Readiness::Unreachable(reason) => {
            println!(
                "Server at {}: unreachable ({})",
                config.server.endpoint, reason
            );
        }
    }

    println!(
        "\nChecked at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}
