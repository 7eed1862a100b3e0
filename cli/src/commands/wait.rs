use anyhow::Result;
use indicatif::ProgressBar;
use std::time::Duration;

use tritonup_core::Config;
use tritonup_launcher::{wait_until_ready, TritonClient};

pub async fn execute(max_checks: Option<u64>) -> Result<()> {
    let config = Config::load()?;
    let mut wait = config.wait.clone();
    if max_checks.is_some() {
        wait.max_checks = max_checks;
    }

    let server = TritonClient::new(&config.server.endpoint);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Waiting for {}...", config.server.endpoint));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = wait_until_ready(&server, &wait).await;
    spinner.finish_and_clear();
    result?;

    println!("Server is ready at {}", config.server.endpoint);
    Ok(())
}
