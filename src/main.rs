use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod cli;

use cli::commands::init::InitCommand;
use cli::commands::render::RenderCommand;
use cli::commands::submit::SubmitCommand;
use cli::commands::validate::ValidateCommand;
use cli::commands::Command;
use cli::{Cli, Commands};
use techform::config::TechformConfig;
use techform::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();
    // .env must be in the environment before the configuration reads it
    let env_file = TechformConfig::load_env_file();
    let config = cli.load_config()?;
    init_telemetry(&config.observability)?;

    match env_file {
        Ok(true) => info!("Loaded environment variables from .env file"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "Ignoring malformed .env file"),
    }

    let config_path = cli.config_path();
    tokio::runtime::Runtime::new()?.block_on(async move {
        match cli.command {
            Commands::Validate { file, json } => {
                ValidateCommand {
                    file,
                    policy: config.validation,
                    json,
                }
                .execute()
                .await
            }
            Commands::Submit { file } => SubmitCommand { file, config }.execute().await,
            Commands::Render { file } => {
                RenderCommand {
                    file,
                    max_avatar_bytes: config.validation.max_avatar_bytes,
                }
                .execute()
                .await
            }
            Commands::Init { force } => {
                InitCommand {
                    path: config_path,
                    force,
                }
                .execute()
                .await
            }
        }
    })
}
