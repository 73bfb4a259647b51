// techform - registration form validation and avatar submission
// This exposes the core components for testing and integration

pub mod config;
pub mod form;
pub mod record_file;
pub mod render;
pub mod storage;
pub mod submission;
pub mod telemetry;
pub mod validation;

// Re-export key types for easy access
pub use config::TechformConfig;
pub use form::{FieldBinding, FormContext, FormError, TechKey, TechList};
pub use render::render_form;
pub use storage::{ObjectStorage, StorageError, SupabaseStorage};
pub use submission::{SubmissionOrchestrator, SubmissionOutcome, SubmissionPhase};
pub use telemetry::{create_submission_span, generate_correlation_id, init_telemetry};
pub use validation::{
    validate, AvatarFile, CandidateRecord, FieldErrorSet, FieldPath, NormalizedRecord, TechInput,
    ValidationPolicy, Validator,
};
