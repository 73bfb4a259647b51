use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use techform::config::TechformConfig;

pub mod commands;

const DEFAULT_CONFIG_FILE: &str = "techform.toml";

#[derive(Parser)]
#[command(name = "techform")]
#[command(about = "Validate registration records and upload their avatars")]
#[command(long_about = "techform validates a registration record (name, e-mail, password, \
                       technologies and avatar), normalizes it, and uploads the avatar to the \
                       configured storage bucket. Start with 'techform validate record.toml'.")]
pub struct Cli {
    /// Configuration file to use instead of ./techform.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a record file and print the normalized record or the field errors
    Validate {
        /// Record file (.toml or .json)
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long, help = "Print the normalized record or the error set as JSON")]
        json: bool,
    },
    /// Validate a record file, upload its avatar and show the resulting form
    Submit {
        /// Record file (.toml or .json)
        file: PathBuf,
    },
    /// Show the form for a record file without submitting it
    Render {
        /// Record file (.toml or .json)
        file: PathBuf,
    },
    /// Write a configuration file with the default settings
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Configuration from `--config` if given, otherwise from ./techform.toml
    pub fn load_config(&self) -> Result<TechformConfig> {
        TechformConfig::load_from(&self.config_path())
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
