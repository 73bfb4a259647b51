//! Submission orchestrator
//!
//! On submit: validate the candidate; on success upload the avatar once and
//! display the normalized record; on failure surface the field errors with
//! no side effects. Every error is turned into a [`SubmissionOutcome`] here
//! and none escape.

pub mod state_machine;

pub use state_machine::{SubmissionEvent, SubmissionMachine, SubmissionPhase};

use crate::config::DEFAULT_BUCKET;
use crate::storage::ObjectStorage;
use crate::telemetry::{create_submission_span, generate_correlation_id};
use crate::validation::{CandidateRecord, FieldErrorSet, NormalizedRecord, Validator};
use statig::prelude::*;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn, Instrument};

pub const MSG_AVATAR_REQUIRED: &str = "Avatar is required";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Validation failed; nothing was uploaded
    Rejected(FieldErrorSet),
    /// Avatar stored; `output` is the serialized record
    Uploaded {
        record: NormalizedRecord,
        output: String,
    },
    /// Validation passed but the upload failed
    UploadFailed { message: String },
    /// Validation passed but the record could not be submitted locally
    LocalFailure { message: String },
}

impl SubmissionOutcome {
    /// Text for the output area; `None` leaves the output area untouched
    pub fn output(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Rejected(_) => None,
            SubmissionOutcome::Uploaded { output, .. } => Some(output),
            SubmissionOutcome::UploadFailed { message } => Some(message),
            SubmissionOutcome::LocalFailure { message } => Some(message),
        }
    }

    pub fn errors(&self) -> Option<&FieldErrorSet> {
        match self {
            SubmissionOutcome::Rejected(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, SubmissionOutcome::Uploaded { .. })
    }
}

pub struct SubmissionOrchestrator {
    validator: Validator,
    storage: Arc<dyn ObjectStorage>,
    bucket: String,
    machine: Mutex<StateMachine<SubmissionMachine>>,
    in_flight: AtomicUsize,
    overlapping: AtomicU64,
    uploads: AtomicU64,
}

impl SubmissionOrchestrator {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self::with_validator(storage, Validator::default())
    }

    pub fn with_validator(storage: Arc<dyn ObjectStorage>, validator: Validator) -> Self {
        Self {
            validator,
            storage,
            bucket: DEFAULT_BUCKET.to_string(),
            machine: Mutex::new(SubmissionMachine::new().state_machine()),
            in_flight: AtomicUsize::new(0),
            overlapping: AtomicU64::new(0),
            uploads: AtomicU64::new(0),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn phase(&self) -> SubmissionPhase {
        self.machine.lock().await.inner().phase()
    }

    pub async fn attempts(&self) -> u64 {
        self.machine.lock().await.inner().attempts()
    }

    /// Upload calls made so far
    pub fn uploads(&self) -> u64 {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Submits that started while another submit was still running
    pub fn overlapping_submits(&self) -> u64 {
        self.overlapping.load(Ordering::SeqCst)
    }

    async fn fire(&self, event: SubmissionEvent) -> u64 {
        let mut machine = self.machine.lock().await;
        machine.handle(&event);
        machine.inner().attempts()
    }

    /// Run one submit attempt.
    pub async fn submit(&self, candidate: CandidateRecord) -> SubmissionOutcome {
        let overlapping = self.in_flight.fetch_add(1, Ordering::SeqCst);
        let attempt = self.fire(SubmissionEvent::Submit).await;
        let correlation_id = generate_correlation_id();
        let span = create_submission_span(attempt, &correlation_id);

        if overlapping > 0 {
            self.overlapping.fetch_add(1, Ordering::SeqCst);
            span.in_scope(|| warn!(in_flight = overlapping, "Submit started while another submission is in flight"));
        }

        let outcome = self.run(candidate).instrument(span).await;
        self.fire(SubmissionEvent::Settle).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn run(&self, candidate: CandidateRecord) -> SubmissionOutcome {
        match self.validator.validate(&candidate) {
            Err(errors) => {
                info!(
                    fields = errors.len(),
                    violations = errors.violation_count(),
                    "Submission rejected by validation"
                );
                self.fire(SubmissionEvent::ValidationFailed {
                    violations: errors.violation_count(),
                })
                .await;
                SubmissionOutcome::Rejected(errors)
            }
            Ok(record) => {
                self.fire(SubmissionEvent::ValidationPassed).await;
                self.complete(record).await
            }
        }
    }

    /// Side effects for a validated record: one upload, then display.
    pub(crate) async fn complete(&self, record: NormalizedRecord) -> SubmissionOutcome {
        let Some(avatar) = record.avatar.as_ref() else {
            warn!("Validated record has no avatar, skipping upload");
            return SubmissionOutcome::LocalFailure {
                message: MSG_AVATAR_REQUIRED.to_string(),
            };
        };

        self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self
            .storage
            .upload(&self.bucket, &avatar.name, &avatar.content)
            .await
        {
            warn!(bucket = %self.bucket, key = %avatar.name, error = %e, "Avatar upload failed");
            return SubmissionOutcome::UploadFailed {
                message: e.to_string(),
            };
        }
        info!(bucket = %self.bucket, key = %avatar.name, bytes = avatar.size, "Avatar uploaded");

        match record.to_display_json() {
            Ok(output) => SubmissionOutcome::Uploaded { record, output },
            Err(e) => SubmissionOutcome::LocalFailure {
                message: e.to_string(),
            },
        }
    }
}

impl std::fmt::Debug for SubmissionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionOrchestrator")
            .field("validator", &self.validator)
            .field("storage", &"Arc<dyn ObjectStorage>")
            .field("bucket", &self.bucket)
            .field("machine", &"Mutex<StateMachine<SubmissionMachine>>")
            .finish()
    }
}
