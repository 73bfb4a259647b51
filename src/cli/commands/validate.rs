use super::Command;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use techform::record_file::load_candidate;
use techform::validation::{ValidationPolicy, Validator};

pub struct ValidateCommand {
    pub file: PathBuf,
    pub policy: ValidationPolicy,
    pub json: bool,
}

impl Command for ValidateCommand {
    async fn execute(&self) -> Result<()> {
        let candidate = load_candidate(&self.file, self.policy.max_avatar_bytes)
            .with_context(|| format!("Could not load record {}", self.file.display()))?;
        let validator = Validator::new(self.policy.clone());

        match validator.validate(&candidate) {
            Ok(record) => {
                if !self.json {
                    println!("✅ Record is valid");
                }
                println!("{}", record.to_display_json()?);
                Ok(())
            }
            Err(errors) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&errors)?);
                } else {
                    println!("❌ Record is invalid ({} fields):", errors.len());
                    for (path, message) in errors.iter() {
                        println!("   → {path}: {message}");
                    }
                }
                bail!("validation failed for {}", self.file.display())
            }
        }
    }
}
