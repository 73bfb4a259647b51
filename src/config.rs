use crate::validation::ValidationPolicy;
use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BUCKET: &str = "form-react";

/// Main configuration structure for techform
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TechformConfig {
    /// Storage service settings
    pub storage: StorageConfig,
    /// Overrides for the field rule limits
    pub validation: ValidationPolicy,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage service endpoint (can be set via env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Storage access key (can be set via env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    /// Bucket avatars are uploaded into
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: None,
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("bucket", &self.bucket)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of plain text
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: true,
        }
    }
}

/// Environment variables checked, in order, when no endpoint is configured
const ENDPOINT_VARS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASEURL"];
/// Environment variables checked, in order, when no access key is configured
const ACCESS_KEY_VARS: [&str; 2] = ["SUPABASE_KEY", "VITE_SUPABASEKEY"];

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
}

impl TechformConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (techform.toml)
    /// 3. Environment variables (prefixed with TECHFORM_, `__` between sections)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("techform.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TECHFORM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut techform_config: TechformConfig = builder.build()?.try_deserialize()?;

        // Storage credentials: fall back to the well-known variable names
        if techform_config.storage.endpoint.is_none() {
            techform_config.storage.endpoint = first_env(&ENDPOINT_VARS);
        }
        if techform_config.storage.access_key.is_none() {
            techform_config.storage.access_key = first_env(&ACCESS_KEY_VARS);
        }

        Ok(techform_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load `.env` from the working directory if it exists.
    ///
    /// Runs before logging is set up, so the caller reports the result:
    /// `Ok(true)` when a file was loaded, `Ok(false)` when there was none.
    pub fn load_env_file() -> Result<bool> {
        if !Path::new(".env").exists() {
            return Ok(false);
        }
        dotenvy::from_path(".env")?;
        Ok(true)
    }
}
