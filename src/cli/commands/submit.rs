use super::Command;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use techform::config::TechformConfig;
use techform::form::FormContext;
use techform::record_file::load_candidate;
use techform::render::render_form;
use techform::storage::SupabaseStorage;
use techform::submission::{SubmissionOrchestrator, SubmissionOutcome};
use techform::validation::Validator;

pub struct SubmitCommand {
    pub file: PathBuf,
    pub config: TechformConfig,
}

impl Command for SubmitCommand {
    async fn execute(&self) -> Result<()> {
        let candidate = load_candidate(&self.file, self.config.validation.max_avatar_bytes)
            .with_context(|| format!("Could not load record {}", self.file.display()))?;
        let storage = SupabaseStorage::from_config(&self.config.storage)
            .context("Could not set up avatar storage")?;

        let orchestrator = SubmissionOrchestrator::with_validator(
            Arc::new(storage),
            Validator::new(self.config.validation.clone()),
        )
        .with_bucket(self.config.storage.bucket.clone());

        let mut form = FormContext::from_candidate(candidate);
        let outcome = form.handle_submit(&orchestrator).await;
        print!("{}", render_form(&form));

        match outcome {
            SubmissionOutcome::Uploaded { .. } => Ok(()),
            SubmissionOutcome::Rejected(errors) => {
                bail!("submission rejected: {} invalid fields", errors.len())
            }
            SubmissionOutcome::UploadFailed { message } | SubmissionOutcome::LocalFailure { message } => {
                bail!("submission failed: {message}")
            }
        }
    }
}
