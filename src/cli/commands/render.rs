use super::Command;
use anyhow::{Context, Result};
use std::path::PathBuf;
use techform::form::FormContext;
use techform::record_file::load_candidate;
use techform::render::render_form;

pub struct RenderCommand {
    pub file: PathBuf,
    /// Avatars above this size are shown by name without being read
    pub max_avatar_bytes: u64,
}

impl Command for RenderCommand {
    async fn execute(&self) -> Result<()> {
        let candidate = load_candidate(&self.file, self.max_avatar_bytes)
            .with_context(|| format!("Could not load record {}", self.file.display()))?;
        let form = FormContext::from_candidate(candidate);
        print!("{}", render_form(&form));
        Ok(())
    }
}
