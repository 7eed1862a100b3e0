mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tritonup")]
#[command(author, version, about = "Launch a Triton inference-server container and wait for readiness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure the server container is running and wait until it is ready
    Up,

    /// Show container and server readiness status
    Status,

    /// Wait for the server to report readiness
    Wait {
        /// Maximum number of readiness checks before giving up
        #[arg(long)]
        max_checks: Option<u64>,
    },

    /// Stop and remove the server container
    Down,

    /// View or set configuration
    Config {
        /// Config key (e.g., "server.image", "wait.retry_delay_secs")
        key: Option<String>,

        /// Value to set (if omitted, shows current value)
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Up => {
            commands::up::execute().await?;
        }
        Commands::Status => {
            commands::status::execute().await?;
        }
        Commands::Wait { max_checks } => {
            commands::wait::execute(max_checks).await?;
        }
        Commands::Down => {
            commands::down::execute().await?;
        }
        Commands::Config { key, value } => {
            commands::config::execute(key.as_deref(), value.as_deref()).await?;
        }
    }

    Ok(())
}
