use serde::{Deserialize, Serialize};

/// Largest accepted avatar, 5 MiB
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;
pub const REQUIRED_EMAIL_SUFFIX: &str = "@gmail.com";
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const KNOWLEDGE_MIN: u8 = 1;
pub const KNOWLEDGE_MAX: u8 = 100;
pub const MIN_TECHS: usize = 1;

/// Limits the field rules are built from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Maximum avatar size in bytes (inclusive)
    pub max_avatar_bytes: u64,
    /// Suffix the lower-cased email must end with
    pub email_suffix: String,
    /// Minimum password length in characters
    pub min_password_chars: usize,
    pub knowledge_min: u8,
    pub knowledge_max: u8,
    /// Minimum number of technologies entries
    pub min_techs: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_avatar_bytes: MAX_AVATAR_BYTES,
            email_suffix: REQUIRED_EMAIL_SUFFIX.to_string(),
            min_password_chars: MIN_PASSWORD_CHARS,
            knowledge_min: KNOWLEDGE_MIN,
            knowledge_max: KNOWLEDGE_MAX,
            min_techs: MIN_TECHS,
        }
    }
}
