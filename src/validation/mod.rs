//! Validation/transform engine
//!
//! Turns a [`CandidateRecord`] into either a [`NormalizedRecord`] or a
//! [`FieldErrorSet`]. Every field is evaluated and every violation is
//! reported; a record is never partially normalized.

pub mod errors;
pub mod policy;
pub mod record;
pub mod rules;

pub use errors::{FieldErrorSet, FieldPath, TechField, UnknownFieldPath};
pub use policy::ValidationPolicy;
pub use record::{AvatarFile, CandidateRecord, KnowledgeInput, NormalizedRecord, Tech, TechInput};

use rules::{capitalize_words, coerce_number, has_only_single_spaces, is_email, FieldRule};

pub const MSG_AVATAR: &str = "Please select an image file of up to 5MB";
pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_NAME_SPACING: &str = "Name words must be separated by a single space";
pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_EMAIL_FORMAT: &str = "Invalid email format";
pub const MSG_TITLE_REQUIRED: &str = "Title is required";
pub const MSG_KNOWLEDGE_NAN: &str = "Expected number, received nan";
pub const MSG_KNOWLEDGE_INTEGER: &str = "Expected integer, received float";

/// The schema: one rule per field path.
#[derive(Debug)]
pub struct Validator {
    policy: ValidationPolicy,
    avatar: FieldRule<Option<AvatarFile>, Option<AvatarFile>>,
    name: FieldRule<str, String>,
    email: FieldRule<str, String>,
    password: FieldRule<str, String>,
    techs: FieldRule<[TechInput], ()>,
    title: FieldRule<str, String>,
    knowledge: FieldRule<f64, u8>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        let max_avatar = policy.max_avatar_bytes;
        let avatar = FieldRule::new(|avatar: &Option<AvatarFile>| avatar.clone()).check(
            move |avatar: &Option<AvatarFile>| {
                avatar
                    .as_ref()
                    .is_some_and(|file| file.size <= max_avatar)
            },
            MSG_AVATAR,
        );

        let name = FieldRule::new(capitalize_words)
            .check(|name: &str| !name.trim().is_empty(), MSG_NAME_REQUIRED)
            .check(has_only_single_spaces, MSG_NAME_SPACING);

        let suffix = policy.email_suffix.to_lowercase();
        let email = FieldRule::new(|email: &str| email.to_lowercase())
            .check(|email: &str| !email.is_empty(), MSG_EMAIL_REQUIRED)
            .check(is_email, MSG_EMAIL_FORMAT)
            .check(
                move |email: &str| email.to_lowercase().ends_with(&suffix),
                format!("Email must end with {}", policy.email_suffix),
            );

        let min_password = policy.min_password_chars;
        let password = FieldRule::new(str::to_string).check(
            move |password: &str| password.chars().count() >= min_password,
            format!("Password must be at least {min_password} characters"),
        );

        let min_techs = policy.min_techs;
        let techs = FieldRule::new(|_: &[TechInput]| ()).check(
            move |techs: &[TechInput]| techs.len() >= min_techs,
            if min_techs == 1 {
                "Add at least one technology".to_string()
            } else {
                format!("Add at least {min_techs} technologies")
            },
        );

        let title = FieldRule::new(str::to_string).check(|title: &str| !title.is_empty(), MSG_TITLE_REQUIRED);

        let (lo, hi) = (policy.knowledge_min, policy.knowledge_max);
        // Bounds are u8, so a value that passes both range checks fits in u8.
        let knowledge = FieldRule::new(|value: &f64| *value as u8)
            .check(|value: &f64| value.fract() == 0.0 || !value.is_finite(), MSG_KNOWLEDGE_INTEGER)
            .check(
                move |value: &f64| *value >= f64::from(lo),
                format!("Number must be greater than or equal to {lo}"),
            )
            .check(
                move |value: &f64| *value <= f64::from(hi),
                format!("Number must be less than or equal to {hi}"),
            );

        Self {
            policy,
            avatar,
            name,
            email,
            password,
            techs,
            title,
            knowledge,
        }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate and normalize `candidate`.
    pub fn validate(&self, candidate: &CandidateRecord) -> Result<NormalizedRecord, FieldErrorSet> {
        let mut errors = FieldErrorSet::new();

        let avatar = self.avatar.apply(FieldPath::Avatar, &candidate.avatar, &mut errors);
        let name = self.name.apply(FieldPath::Name, &candidate.name, &mut errors);
        let email = self.email.apply(FieldPath::Email, &candidate.email, &mut errors);
        let password = self.password.apply(FieldPath::Password, &candidate.password, &mut errors);

        let mut techs = Vec::with_capacity(candidate.techs.len());
        for (index, entry) in candidate.techs.iter().enumerate() {
            if let Some(tech) = self.validate_tech(index, entry, &mut errors) {
                techs.push(tech);
            }
        }
        let techs_ok = self.techs.apply(FieldPath::Techs, &candidate.techs, &mut errors);

        match (avatar, name, email, password, techs_ok) {
            (Some(avatar), Some(name), Some(email), Some(password), Some(())) if errors.is_empty() => {
                Ok(NormalizedRecord {
                    avatar,
                    name,
                    email,
                    password,
                    techs,
                })
            }
            _ => Err(errors),
        }
    }

    fn validate_tech(&self, index: usize, entry: &TechInput, errors: &mut FieldErrorSet) -> Option<Tech> {
        let title = self.title.apply(FieldPath::tech_title(index), &entry.title, errors);

        let path = FieldPath::tech_knowledge(index);
        let knowledge = match coerce_knowledge(&entry.knowledge) {
            Some(value) => self.knowledge.apply(path, &value, errors),
            None => {
                errors.push(path, MSG_KNOWLEDGE_NAN);
                None
            }
        };

        Some(Tech {
            title: title?,
            knowledge: knowledge?,
        })
    }
}

fn coerce_knowledge(input: &KnowledgeInput) -> Option<f64> {
    match input {
        KnowledgeInput::Number(n) if n.is_nan() => None,
        KnowledgeInput::Number(n) => Some(*n),
        KnowledgeInput::Text(text) => coerce_number(text),
    }
}

/// Validate with the default policy.
pub fn validate(candidate: &CandidateRecord) -> Result<NormalizedRecord, FieldErrorSet> {
    Validator::default().validate(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar(size: u64) -> AvatarFile {
        AvatarFile {
            name: "me.png".to_string(),
            size,
            content: Vec::new(),
        }
    }

    fn valid_candidate() -> CandidateRecord {
        CandidateRecord {
            avatar: Some(avatar(1024)),
            name: "ana maria".to_string(),
            email: "ANA@gmail.com".to_string(),
            password: "secret1".to_string(),
            techs: vec![TechInput::new("Rust", 80)],
        }
    }

    #[test]
    fn test_valid_candidate_is_normalized() {
        let record = validate(&valid_candidate()).unwrap();
        assert_eq!(record.name, "Ana Maria");
        assert_eq!(record.email, "ana@gmail.com");
        assert_eq!(record.password, "secret1");
        assert_eq!(record.techs, vec![Tech { title: "Rust".to_string(), knowledge: 80 }]);
        assert_eq!(record.avatar.as_ref().map(|a| a.name.as_str()), Some("me.png"));
    }

    #[test]
    fn test_missing_avatar_fails() {
        let mut candidate = valid_candidate();
        candidate.avatar = None;
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::Avatar), Some(MSG_AVATAR));
    }

    #[test]
    fn test_avatar_size_limit_is_inclusive() {
        let mut candidate = valid_candidate();
        candidate.avatar = Some(avatar(5_242_880));
        assert!(validate(&candidate).is_ok());

        candidate.avatar = Some(avatar(5_242_881));
        let errors = validate(&candidate).unwrap_err();
        assert!(errors.contains(&FieldPath::Avatar));
    }

    #[test]
    fn test_double_space_in_name_is_rejected() {
        let mut candidate = valid_candidate();
        candidate.name = "joão  silva".to_string();
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::Name), Some(MSG_NAME_SPACING));

        candidate.name = "joão silva".to_string();
        assert_eq!(validate(&candidate).unwrap().name, "João Silva");
    }

    #[test]
    fn test_blank_name_is_required() {
        let mut candidate = valid_candidate();
        candidate.name = "   ".to_string();
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::Name), Some(MSG_NAME_REQUIRED));
    }

    #[test]
    fn test_email_domain_is_checked_after_lowercasing() {
        let mut candidate = valid_candidate();
        candidate.email = "Foo@GMAIL.com".to_string();
        assert_eq!(validate(&candidate).unwrap().email, "foo@gmail.com");

        candidate.email = "foo@yahoo.com".to_string();
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::Email), Some("Email must end with @gmail.com"));
    }

    #[test]
    fn test_empty_email_reports_required_first() {
        let mut candidate = valid_candidate();
        candidate.email = String::new();
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::Email), Some(MSG_EMAIL_REQUIRED));
        assert_eq!(errors.messages(&FieldPath::Email).len(), 3);
    }

    #[test]
    fn test_password_length() {
        let mut candidate = valid_candidate();
        candidate.password = "abc12".to_string();
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(
            errors.message(&FieldPath::Password),
            Some("Password must be at least 6 characters")
        );

        candidate.password = "abc123".to_string();
        assert!(validate(&candidate).is_ok());
    }

    #[test]
    fn test_empty_techs_reports_array_level_error() {
        let mut candidate = valid_candidate();
        candidate.techs.clear();
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::Techs), Some("Add at least one technology"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_knowledge_bounds() {
        for bad in [0, 101] {
            let mut candidate = valid_candidate();
            candidate.techs = vec![TechInput::new("Rust", bad)];
            let errors = validate(&candidate).unwrap_err();
            assert!(errors.contains(&FieldPath::tech_knowledge(0)), "{bad} should fail");
            assert!(!errors.contains(&FieldPath::Techs));
        }
    }

    #[test]
    fn test_knowledge_text_is_coerced() {
        let mut candidate = valid_candidate();
        candidate.techs = vec![TechInput::new("Rust", "50")];
        assert_eq!(validate(&candidate).unwrap().techs[0].knowledge, 50);
    }

    #[test]
    fn test_hex_knowledge_is_coerced() {
        let mut candidate = valid_candidate();
        candidate.techs = vec![TechInput::new("Rust", "0x10")];
        assert_eq!(validate(&candidate).unwrap().techs[0].knowledge, 16);
    }

    #[test]
    fn test_unparseable_knowledge_fails_without_panicking() {
        let mut candidate = valid_candidate();
        candidate.techs = vec![TechInput::new("Rust", "lots")];
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::tech_knowledge(0)), Some(MSG_KNOWLEDGE_NAN));
        assert_eq!(errors.messages(&FieldPath::tech_knowledge(0)).len(), 1);
    }

    #[test]
    fn test_fractional_knowledge_is_rejected() {
        let mut candidate = valid_candidate();
        candidate.techs = vec![TechInput::new("Rust", "12.5")];
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::tech_knowledge(0)), Some(MSG_KNOWLEDGE_INTEGER));
    }

    #[test]
    fn test_all_violations_are_aggregated() {
        let candidate = CandidateRecord {
            avatar: None,
            name: String::new(),
            email: "x@yahoo.com".to_string(),
            password: "123".to_string(),
            techs: vec![TechInput::new("", 0), TechInput::new("Go", 50)],
        };
        let errors = validate(&candidate).unwrap_err();
        let paths: Vec<String> = errors.paths().map(ToString::to_string).collect();
        assert_eq!(
            paths,
            ["avatar", "name", "email", "password", "techs.0.title", "techs.0.knowledge"]
        );
    }

    #[test]
    fn test_custom_policy() {
        let validator = Validator::new(ValidationPolicy {
            email_suffix: "@example.org".to_string(),
            min_techs: 2,
            ..ValidationPolicy::default()
        });
        let mut candidate = valid_candidate();
        candidate.email = "ana@example.org".to_string();
        let errors = validator.validate(&candidate).unwrap_err();
        assert_eq!(errors.message(&FieldPath::Techs), Some("Add at least 2 technologies"));
        assert!(!errors.contains(&FieldPath::Email));
    }
}
