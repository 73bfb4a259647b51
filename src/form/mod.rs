//! Form context
//!
//! Explicit replacement for ambient form state: current field values,
//! current errors, the output area, and the mutators that change them.
//! Everything that needs the form gets a `&FormContext` or
//! `&mut FormContext` passed in.

pub mod techs;

pub use techs::{TechKey, TechList};

use crate::submission::{SubmissionOrchestrator, SubmissionOutcome};
use crate::validation::{
    AvatarFile, CandidateRecord, FieldErrorSet, FieldPath, KnowledgeInput, TechField, TechInput,
    UnknownFieldPath,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    UnknownPath(#[from] UnknownFieldPath),
    #[error("Technology entry {index} does not exist ({len} entries)")]
    NoSuchEntry { index: usize, len: usize },
    #[error("Field {path} does not take text input")]
    NotTextInput { path: String },
    #[error("Field {path} is not an input")]
    NotAnInput { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    File,
    Text,
    Email,
    Password,
    Number,
}

/// What a rendered input needs to know about its field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldBinding {
    pub path: FieldPath,
    pub label: String,
    pub kind: InputKind,
    pub value: String,
    pub error: Option<String>,
    /// Identity of the technologies entry the field belongs to
    pub key: Option<TechKey>,
}

#[derive(Debug, Default)]
pub struct FormContext {
    avatar: Option<AvatarFile>,
    name: String,
    email: String,
    password: String,
    techs: TechList,
    errors: FieldErrorSet,
    output: String,
}

impl FormContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load field values from an existing record; errors and output start empty.
    pub fn from_candidate(candidate: CandidateRecord) -> Self {
        let mut form = Self {
            avatar: candidate.avatar,
            name: candidate.name,
            email: candidate.email,
            password: candidate.password,
            ..Self::default()
        };
        for tech in candidate.techs {
            form.techs.append(tech);
        }
        form
    }

    /// Bind an input to `path` (for example `techs.0.title`).
    pub fn register(&self, path: &str) -> Result<FieldBinding, FormError> {
        let path: FieldPath = path.parse()?;
        self.binding(path)
    }

    pub fn binding(&self, path: FieldPath) -> Result<FieldBinding, FormError> {
        let error = self.errors.message(&path).map(str::to_string);
        let binding = |label: &str, kind: InputKind, value: String, key: Option<TechKey>| FieldBinding {
            path,
            label: label.to_string(),
            kind,
            value,
            error: error.clone(),
            key,
        };

        Ok(match path {
            FieldPath::Avatar => binding(
                "Avatar",
                InputKind::File,
                self.avatar.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
                None,
            ),
            FieldPath::Name => binding("Name", InputKind::Text, self.name.clone(), None),
            FieldPath::Email => binding("E-mail", InputKind::Email, self.email.clone(), None),
            FieldPath::Password => binding("Password", InputKind::Password, self.password.clone(), None),
            FieldPath::Techs => {
                return Err(FormError::NotAnInput {
                    path: path.to_string(),
                })
            }
            FieldPath::Tech { index, field } => {
                let entry = self.techs.get(index).ok_or(FormError::NoSuchEntry {
                    index,
                    len: self.techs.len(),
                })?;
                let key = self.techs.key_at(index);
                match field {
                    TechField::Title => binding(
                        &format!("Title {}", index + 1),
                        InputKind::Text,
                        entry.title.clone(),
                        key,
                    ),
                    TechField::Knowledge => binding(
                        &format!("Knowledge {}", index + 1),
                        InputKind::Number,
                        entry.knowledge.to_string(),
                        key,
                    ),
                }
            }
        })
    }

    /// Set the text of a text-like input.
    pub fn set_value(&mut self, path: &str, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        match path.parse::<FieldPath>()? {
            FieldPath::Name => self.name = value,
            FieldPath::Email => self.email = value,
            FieldPath::Password => self.password = value,
            FieldPath::Tech { index, field } => {
                let entry = self.techs.get_mut(index)?;
                match field {
                    TechField::Title => entry.title = value,
                    TechField::Knowledge => entry.knowledge = KnowledgeInput::Text(value),
                }
            }
            FieldPath::Avatar => {
                return Err(FormError::NotTextInput {
                    path: path.to_string(),
                })
            }
            FieldPath::Techs => {
                return Err(FormError::NotAnInput {
                    path: path.to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn set_avatar(&mut self, avatar: AvatarFile) {
        self.avatar = Some(avatar);
    }

    pub fn clear_avatar(&mut self) {
        self.avatar = None;
    }

    pub fn append_tech(&mut self, entry: TechInput) -> TechKey {
        self.techs.append(entry)
    }

    /// Append the blank entry the add control creates.
    pub fn add_tech(&mut self) -> TechKey {
        self.techs.append(TechInput::new("", 0))
    }

    pub fn remove_tech(&mut self, index: usize) -> Result<TechKey, FormError> {
        let (key, _) = self.techs.remove(index)?;
        self.errors.remove_tech_entry(index);
        Ok(key)
    }

    pub fn techs(&self) -> &TechList {
        &self.techs
    }

    pub fn errors(&self) -> &FieldErrorSet {
        &self.errors
    }

    /// Contents of the output area
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Snapshot of the current field values.
    pub fn candidate(&self) -> CandidateRecord {
        CandidateRecord {
            avatar: self.avatar.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            techs: self.techs.to_inputs(),
        }
    }

    /// Reflect a submission outcome in the displayed errors and output area.
    pub fn apply_outcome(&mut self, outcome: &SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Rejected(errors) => self.errors = errors.clone(),
            other => {
                self.errors.clear();
                if let Some(text) = other.output() {
                    self.output = text.to_string();
                }
            }
        }
    }

    /// Collect the candidate, run it through `orchestrator`, and apply the outcome.
    pub async fn handle_submit(&mut self, orchestrator: &SubmissionOrchestrator) -> SubmissionOutcome {
        let outcome = orchestrator.submit(self.candidate()).await;
        self.apply_outcome(&outcome);
        outcome
    }
}
