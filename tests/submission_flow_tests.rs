//! End-to-end submission tests through the form context
//!
//! Storage is replaced by a recording fake so every upload call can be
//! inspected without touching the network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use techform::form::FormContext;
use techform::render::render_form;
use techform::storage::{ObjectStorage, StorageError};
use techform::submission::{SubmissionOrchestrator, SubmissionOutcome, SubmissionPhase};
use techform::validation::{AvatarFile, FieldPath};
use tokio::sync::Barrier;

#[derive(Debug, Clone, PartialEq)]
struct UploadCall {
    bucket: String,
    key: String,
    bytes: usize,
}

/// Records uploads and answers with a preset result
struct RecordingStorage {
    calls: Mutex<Vec<UploadCall>>,
    response: Result<(), StorageError>,
}

impl RecordingStorage {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response: Ok(()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response: Err(StorageError::Rejected {
                status: 400,
                message: message.to_string(),
            }),
        })
    }

    fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn upload(&self, bucket: &str, key: &str, content: &[u8]) -> Result<(), StorageError> {
        self.calls.lock().unwrap().push(UploadCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            bytes: content.len(),
        });
        self.response.clone()
    }
}

fn ana_form() -> FormContext {
    let mut form = FormContext::new();
    form.set_avatar(AvatarFile::new("ana-avatar.png", vec![7; 2048]));
    form.set_value("name", "ana maria").unwrap();
    form.set_value("email", "ANA@gmail.com").unwrap();
    form.set_value("password", "secret1").unwrap();
    form.add_tech();
    form.set_value("techs.0.title", "Rust").unwrap();
    form.set_value("techs.0.knowledge", "50").unwrap();
    form
}

#[tokio::test]
async fn test_valid_form_uploads_avatar_and_shows_normalized_record() {
    let storage = RecordingStorage::succeeding();
    let orchestrator = SubmissionOrchestrator::new(storage.clone());
    let mut form = ana_form();

    let outcome = form.handle_submit(&orchestrator).await;
    assert!(outcome.is_uploaded(), "unexpected outcome: {outcome:?}");

    assert_eq!(
        storage.calls(),
        vec![UploadCall {
            bucket: "form-react".to_string(),
            key: "ana-avatar.png".to_string(),
            bytes: 2048,
        }]
    );

    let shown: serde_json::Value = serde_json::from_str(form.output()).unwrap();
    assert_eq!(shown["name"], "Ana Maria");
    assert_eq!(shown["email"], "ana@gmail.com");
    assert_eq!(shown["password"], "secret1");
    assert_eq!(shown["techs"], serde_json::json!([{ "title": "Rust", "knowledge": 50 }]));
    assert!(form.errors().is_empty());
    assert_eq!(orchestrator.phase().await, SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_upload_failure_shows_message_instead_of_record() {
    let storage = RecordingStorage::failing("Bucket not found");
    let orchestrator = SubmissionOrchestrator::new(storage.clone());
    let mut form = ana_form();

    let outcome = form.handle_submit(&orchestrator).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::UploadFailed {
            message: "Bucket not found".to_string()
        }
    );
    assert_eq!(form.output(), "Bucket not found");
    assert!(!form.output().contains("Ana Maria"));
    assert_eq!(storage.calls().len(), 1);
}

#[tokio::test]
async fn test_invalid_form_shows_inline_errors_without_uploading() {
    let storage = RecordingStorage::succeeding();
    let orchestrator = SubmissionOrchestrator::new(storage.clone());
    let mut form = ana_form();
    form.set_value("email", "ana@yahoo.com").unwrap();
    form.set_value("techs.0.knowledge", "101").unwrap();
    form.clear_avatar();

    let outcome = form.handle_submit(&orchestrator).await;

    assert!(matches!(outcome, SubmissionOutcome::Rejected(_)));
    assert!(storage.calls().is_empty());
    assert_eq!(form.output(), "");
    assert!(form.register("email").unwrap().error.is_some());
    assert!(form.register("avatar").unwrap().error.is_some());
    assert!(form.register("techs.0.knowledge").unwrap().error.is_some());
    assert!(form.register("techs.0.title").unwrap().error.is_none());
}

#[tokio::test]
async fn test_removing_every_tech_reports_array_error() {
    let storage = RecordingStorage::succeeding();
    let orchestrator = SubmissionOrchestrator::new(storage.clone());
    let mut form = ana_form();
    form.remove_tech(0).unwrap();

    form.handle_submit(&orchestrator).await;

    assert_eq!(
        form.errors().message(&FieldPath::Techs),
        Some("Add at least one technology")
    );
    assert!(render_form(&form).contains("! Add at least one technology"));
    assert!(storage.calls().is_empty());
}

#[tokio::test]
async fn test_resubmitting_after_fixing_errors_succeeds() {
    let storage = RecordingStorage::succeeding();
    let orchestrator = SubmissionOrchestrator::new(storage.clone());
    let mut form = ana_form();
    form.set_value("password", "abc12").unwrap();

    let first = form.handle_submit(&orchestrator).await;
    assert!(first.errors().unwrap().contains(&FieldPath::Password));

    form.set_value("password", "abc123").unwrap();
    let second = form.handle_submit(&orchestrator).await;

    assert!(second.is_uploaded());
    assert!(form.errors().is_empty());
    assert_eq!(orchestrator.attempts().await, 2);
    assert_eq!(storage.calls().len(), 1);
}

/// Holds every upload until `parties` uploads are waiting at once
struct GatedStorage {
    gate: Barrier,
    uploads: AtomicUsize,
}

impl GatedStorage {
    fn new(parties: usize) -> Arc<Self> {
        Arc::new(Self {
            gate: Barrier::new(parties),
            uploads: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ObjectStorage for GatedStorage {
    async fn upload(&self, _bucket: &str, _key: &str, _content: &[u8]) -> Result<(), StorageError> {
        self.gate.wait().await;
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_overlapping_submissions_each_upload_once() {
    let storage = GatedStorage::new(2);
    let orchestrator = SubmissionOrchestrator::new(storage.clone());

    let a = ana_form().candidate();
    let b = ana_form().candidate();
    let (first, second) = tokio::time::timeout(
        Duration::from_secs(5),
        async { tokio::join!(orchestrator.submit(a), orchestrator.submit(b)) },
    )
    .await
    .expect("both uploads should be in flight together");

    assert!(first.is_uploaded());
    assert!(second.is_uploaded());
    assert_eq!(storage.uploads.load(Ordering::SeqCst), 2);
    assert_eq!(orchestrator.uploads(), 2);
    assert_eq!(orchestrator.overlapping_submits(), 1);
    assert_eq!(orchestrator.attempts().await, 2);
    assert_eq!(orchestrator.phase().await, SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_sequential_submissions_do_not_overlap() {
    let storage = RecordingStorage::succeeding();
    let orchestrator = SubmissionOrchestrator::new(storage.clone());

    orchestrator.submit(ana_form().candidate()).await;
    orchestrator.submit(ana_form().candidate()).await;

    assert_eq!(storage.calls().len(), 2);
    assert_eq!(orchestrator.overlapping_submits(), 0);
}
