use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which value inside a technologies entry a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TechField {
    Title,
    Knowledge,
}

impl TechField {
    fn as_str(self) -> &'static str {
        match self {
            TechField::Title => "title",
            TechField::Knowledge => "knowledge",
        }
    }
}

/// Path to a form field, including indexed paths such as `techs.0.title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Avatar,
    Name,
    Email,
    Password,
    Techs,
    Tech { index: usize, field: TechField },
}

impl FieldPath {
    pub fn tech_title(index: usize) -> Self {
        FieldPath::Tech {
            index,
            field: TechField::Title,
        }
    }

    pub fn tech_knowledge(index: usize) -> Self {
        FieldPath::Tech {
            index,
            field: TechField::Knowledge,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Avatar => f.write_str("avatar"),
            FieldPath::Name => f.write_str("name"),
            FieldPath::Email => f.write_str("email"),
            FieldPath::Password => f.write_str("password"),
            FieldPath::Techs => f.write_str("techs"),
            FieldPath::Tech { index, field } => write!(f, "techs.{index}.{}", field.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field path: {0}")]
pub struct UnknownFieldPath(pub String);

impl FromStr for FieldPath {
    type Err = UnknownFieldPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownFieldPath(s.to_string());
        match s {
            "avatar" => return Ok(FieldPath::Avatar),
            "name" => return Ok(FieldPath::Name),
            "email" => return Ok(FieldPath::Email),
            "password" => return Ok(FieldPath::Password),
            "techs" => return Ok(FieldPath::Techs),
            _ => {}
        }

        let mut parts = s.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("techs"), Some(index), Some(field), None) => {
                let index = index.parse::<usize>().map_err(|_| unknown())?;
                let field = match field {
                    "title" => TechField::Title,
                    "knowledge" => TechField::Knowledge,
                    _ => return Err(unknown()),
                };
                Ok(FieldPath::Tech { index, field })
            }
            _ => Err(unknown()),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Violations found during one validation attempt, keyed by field path.
///
/// Each path keeps its violations in rule order; the first one is the
/// message displayed next to the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrorSet {
    errors: BTreeMap<FieldPath, Vec<String>>,
}

impl FieldErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: FieldPath, message: impl Into<String>) {
        self.errors.entry(path).or_default().push(message.into());
    }

    /// Message displayed for `path`, if any
    pub fn message(&self, path: &FieldPath) -> Option<&str> {
        self.errors
            .get(path)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn messages(&self, path: &FieldPath) -> &[String] {
        self.errors.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.errors.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of paths with at least one violation
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn violation_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.errors.keys()
    }

    /// Displayed message per path, in path order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.errors
            .iter()
            .filter_map(|(path, messages)| messages.first().map(|m| (path, m.as_str())))
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Drop the errors of a removed technologies entry and shift the
    /// errors of later entries down one position.
    pub fn remove_tech_entry(&mut self, removed: usize) {
        let errors = std::mem::take(&mut self.errors);
        self.errors = errors
            .into_iter()
            .filter_map(|(path, messages)| match path {
                FieldPath::Tech { index, .. } if index == removed => None,
                FieldPath::Tech { index, field } if index > removed => Some((
                    FieldPath::Tech {
                        index: index - 1,
                        field,
                    },
                    messages,
                )),
                other => Some((other, messages)),
            })
            .collect();
    }
}

impl fmt::Display for FieldErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{path}: {message}")?;
        }
        Ok(())
    }
}
