use anyhow::Result;
use tritonup_core::Config;

pub async fn execute(key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;

    match (key, value) {
        // Show all config
        (None, None) => {
            println!("Configuration file: {:?}\n", Config::config_path()?);
            println!("[server]");
            println!("  image = \"{}\"", config.server.image);
            println!("  model_repository = \"{}\"", config.server.model_repository);
            println!("  container_name = \"{}\"", config.server.container_name);
            println!("  endpoint = \"{}\"", config.server.endpoint);
            println!();
            println!("[runtime]");
            println!(
                "  gpu_device_ids = [{}]",
                config
                    .runtime
                    .gpu_device_ids
                    .iter()
                    .map(|id| format!("\"{}\"", id))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("  network_mode = \"{}\"", config.runtime.network_mode);
            println!("  shm_size = \"{}\"", config.runtime.shm_size);
            println!("  auto_remove = {}", config.runtime.auto_remove);
            println!();
            println!("[wait]");
            println!("  startup_delay_secs = {}", config.wait.startup_delay_secs);
            println!("  retry_delay_secs = {}", config.wait.retry_delay_secs);
            println!("  not_ready_delay_secs = {}", config.wait.not_ready_delay_secs);
            println!(
                "  max_checks = {}",
                config
                    .wait
                    .max_checks
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "(unbounded)".to_string())
            );
        }

        // Get a specific key
        (Some(key), None) => {
            let value = get_config_value(&config, key)?;
            println!("{}", value);
        }

        // Set a specific key
        (Some(key), Some(value)) => {
            set_config_value(&mut config, key, value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }

        _ => unreachable!(),
    }

    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    match key {
        "server.image" => Ok(config.server.image.clone()),
        "server.model_repository" => Ok(config.server.model_repository.clone()),
        "server.container_name" => Ok(config.server.container_name.clone()),
        "server.endpoint" => Ok(config.server.endpoint.clone()),
        "runtime.gpu_device_ids" => Ok(config.runtime.gpu_device_ids.join(",")),
        "runtime.network_mode" => Ok(config.runtime.network_mode.clone()),
        "runtime.shm_size" => Ok(config.runtime.shm_size.clone()),
        "runtime.auto_remove" => Ok(config.runtime.auto_remove.to_string()),
        "wait.startup_delay_secs" => Ok(config.wait.startup_delay_secs.to_string()),
        "wait.retry_delay_secs" => Ok(config.wait.retry_delay_secs.to_string()),
        "wait.not_ready_delay_secs" => Ok(config.wait.not_ready_delay_secs.to_string()),
        "wait.max_checks" => Ok(config
            .wait
            .max_checks
            .map(|n| n.to_string())
            .unwrap_or_default()),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "server.image" => config.server.image = value.to_string(),
        "server.model_repository" => config.server.model_repository = value.to_string(),
        "server.container_name" => config.server.container_name = value.to_string(),
        "server.endpoint" => config.server.endpoint = value.to_string(),
        "runtime.gpu_device_ids" => {
            config.runtime.gpu_device_ids = value
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }
        "runtime.network_mode" => config.runtime.network_mode = value.to_string(),
        "runtime.shm_size" => {
            // validate before storing
            tritonup_core::parse_size(value)?;
            config.runtime.shm_size = value.to_string();
        }
        "runtime.auto_remove" => config.runtime.auto_remove = value.parse()?,
        "wait.startup_delay_secs" => config.wait.startup_delay_secs = value.parse()?,
        "wait.retry_delay_secs" => config.wait.retry_delay_secs = value.parse()?,
        "wait.not_ready_delay_secs" => config.wait.not_ready_delay_secs = value.parse()?,
        "wait.max_checks" => {
            config.wait.max_checks = if value.is_empty() {
                None
            } else {
                Some(value.parse()?)
            }
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
    Ok(())
}
