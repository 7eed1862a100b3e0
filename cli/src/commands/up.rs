use anyhow::Result;
use indicatif::ProgressBar;
use std::time::Duration;

use tritonup_core::Config;
use tritonup_launcher::{ensure_running, EnsureOutcome, TritonClient};
use tritonup_runtime_docker::DockerRuntime;

pub async fn execute() -> Result<()> {
    let config = Config::load()?;
    let runtime = DockerRuntime::connect()?;
    let server = TritonClient::new(&config.server.endpoint);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!(
        "Bringing up '{}'...",
        config.server.container_name
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = ensure_running(&runtime, &server, &config).await?;
    spinner.finish_and_clear();

    println!("{}", outcome.summary());
    if matches!(outcome, EnsureOutcome::Launched(_)) {
        println!("Server is ready at {}", config.server.endpoint);
    }

    Ok(())
}
