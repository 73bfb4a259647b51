use serde::{Deserialize, Serialize};

/// A file selected for the avatar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarFile {
    /// Original file name, used as the storage object key
    pub name: String,
    /// Size in bytes
    pub size: u64,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl AvatarFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }
}

/// Raw knowledge value as it arrives from an input: either already numeric
/// or the text typed into a number field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KnowledgeInput {
    Number(f64),
    Text(String),
}

impl Default for KnowledgeInput {
    fn default() -> Self {
        KnowledgeInput::Number(0.0)
    }
}

impl From<i32> for KnowledgeInput {
    fn from(value: i32) -> Self {
        KnowledgeInput::Number(f64::from(value))
    }
}

impl From<&str> for KnowledgeInput {
    fn from(value: &str) -> Self {
        KnowledgeInput::Text(value.to_string())
    }
}

impl std::fmt::Display for KnowledgeInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeInput::Number(n) => write!(f, "{n}"),
            KnowledgeInput::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub knowledge: KnowledgeInput,
}

impl TechInput {
    pub fn new(title: impl Into<String>, knowledge: impl Into<KnowledgeInput>) -> Self {
        Self {
            title: title.into(),
            knowledge: knowledge.into(),
        }
    }
}

/// Field values collected from the form at submit time, not yet validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    pub avatar: Option<AvatarFile>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<TechInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tech {
    pub title: String,
    pub knowledge: u8,
}

/// Validated and transformed record, produced on full validation success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub avatar: Option<AvatarFile>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<Tech>,
}

impl NormalizedRecord {
    /// Pretty JSON shown in the output area.
    pub fn to_display_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
