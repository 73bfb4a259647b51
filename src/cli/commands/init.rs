use super::Command;
use anyhow::{bail, Result};
use std::path::PathBuf;
use techform::config::TechformConfig;
use tracing::info;

pub struct InitCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl Command for InitCommand {
    async fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            );
        }

        TechformConfig::default().save_to_file(&self.path)?;
        info!(path = %self.path.display(), "Wrote default configuration");
        println!("✅ Wrote {}", self.path.display());
        println!("   Set SUPABASE_URL and SUPABASE_KEY (or [storage] endpoint/access_key) before submitting.");
        Ok(())
    }
}
