use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inference server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Container runtime settings
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Readiness wait settings
    #[serde(default)]
    pub wait: WaitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Container image to launch
    #[serde(default = "default_image")]
    pub image: String,

    /// Model repository path inside the container
    #[serde(default = "default_model_repository")]
    pub model_repository: String,

    /// Reserved container name, also used for the existing-instance check
    #[serde(default = "default_container_name")]
    pub container_name: String,

    /// host:port of the server's HTTP health endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// GPU device ids passed to the runtime's device request
    #[serde(default = "default_gpu_device_ids")]
    pub gpu_device_ids: Vec<String>,

    /// Docker network mode ("host", "bridge", "none")
    #[serde(default = "default_network_mode")]
    pub network_mode: String,

    /// Shared-memory size as a docker size string (e.g. "64M")
    #[serde(default = "default_shm_size")]
    pub shm_size: String,

    /// Remove the container automatically when it exits
    #[serde(default = "default_auto_remove")]
    pub auto_remove: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Unconditional delay after launching, before the first readiness probe
    #[serde(default = "default_startup_delay_secs")]
    pub startup_delay_secs: u64,

    /// Delay after a probe error (server unreachable)
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Delay after the server answers "not ready"
    #[serde(default = "default_not_ready_delay_secs")]
    pub not_ready_delay_secs: u64,

    /// Maximum number of readiness checks before giving up (unbounded if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_checks: Option<u64>,
}

fn default_image() -> String {
    "nvcr.io/nvidia/tritonserver:24.08-py3".to_string()
}

fn default_model_repository() -> String {
    "/models".to_string()
}

fn default_container_name() -> String {
    "spark-triton".to_string()
}

fn default_endpoint() -> String {
    "localhost:8000".to_string()
}

fn default_gpu_device_ids() -> Vec<String> {
    vec!["0".to_string()]
}

fn default_network_mode() -> String {
    "host".to_string()
}

fn default_shm_size() -> String {
    "64M".to_string()
}

fn default_auto_remove() -> bool {
    true
}

fn default_startup_delay_secs() -> u64 {
    15
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_not_ready_delay_secs() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            runtime: RuntimeConfig::default(),
            wait: WaitConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            model_repository: default_model_repository(),
            container_name: default_container_name(),
            endpoint: default_endpoint(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gpu_device_ids: default_gpu_device_ids(),
            network_mode: default_network_mode(),
            shm_size: default_shm_size(),
            auto_remove: default_auto_remove(),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            startup_delay_secs: default_startup_delay_secs(),
            retry_delay_secs: default_retry_delay_secs(),
            not_ready_delay_secs: default_not_ready_delay_secs(),
            max_checks: None,
        }
    }
}

impl ServerConfig {
    /// Server command line: `tritonserver --model-repository=<path>`
    pub fn command(&self) -> Vec<String> {
        vec![
            "tritonserver".to_string(),
            format!("--model-repository={}", self.model_repository),
        ]
    }
}

impl WaitConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn not_ready_delay(&self) -> Duration {
        Duration::from_secs(self.not_ready_delay_secs)
    }
}

impl Config {
    /// Get the base directory: ~/.config/tritonup/
    pub fn base_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("USERPROFILE").map(PathBuf::from))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".config").join("tritonup"))
    }

    /// Load config from default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from an explicit path; missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the config file path: ~/.config/tritonup/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bootstrap_script() {
        let config = Config::default();
        assert_eq!(config.server.image, "nvcr.io/nvidia/tritonserver:24.08-py3");
        assert_eq!(config.server.container_name, "spark-triton");
        assert_eq!(config.server.endpoint, "localhost:8000");
        assert_eq!(config.runtime.gpu_device_ids, vec!["0".to_string()]);
        assert_eq!(config.runtime.network_mode, "host");
        assert_eq!(config.runtime.shm_size, "64M");
        assert!(config.runtime.auto_remove);
        assert_eq!(config.wait.startup_delay_secs, 15);
        assert_eq!(config.wait.retry_delay_secs, 5);
        assert_eq!(config.wait.max_checks, None);
    }

    #[test]
    fn server_command_points_at_model_repository() {
        let config = Config::default();
        assert_eq!(
            config.server.command(),
            vec!["tritonserver", "--model-repository=/models"]
        );
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.container_name, "spark-triton");
        assert_eq!(config.wait.startup_delay_secs, 15);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            r#"
            [server]
            container_name = "my-triton"

            [wait]
            retry_delay_secs = 2
            max_checks = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.server.container_name, "my-triton");
        assert_eq!(config.server.image, "nvcr.io/nvidia/tritonserver:24.08-py3");
        assert_eq!(config.wait.retry_delay_secs, 2);
        assert_eq!(config.wait.max_checks, Some(10));
        assert_eq!(config.wait.startup_delay_secs, 15);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.container_name = "roundtrip".to_string();
        config.wait.max_checks = Some(3);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.container_name, "roundtrip");
        assert_eq!(loaded.wait.max_checks, Some(3));
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.server.container_name, "spark-triton");
    }
}
