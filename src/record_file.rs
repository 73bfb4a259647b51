//! Candidate records stored on disk (TOML or JSON), used by the CLI.
//!
//! ```toml
//! avatar = "me.png"        # resolved relative to the record file
//! name = "ana maria"
//! email = "ANA@gmail.com"
//! password = "secret1"
//!
//! [[techs]]
//! title = "Rust"
//! knowledge = "50"
//! ```

use crate::validation::{AvatarFile, CandidateRecord, TechInput};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RecordFileError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("Unsupported record file format: {} (expected .toml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordFile {
    avatar: Option<PathBuf>,
    name: String,
    email: String,
    password: String,
    techs: Vec<TechInput>,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RecordFileError + '_ {
    move |source| RecordFileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn parse(path: &Path) -> Result<RecordFile, RecordFileError> {
    let parse_error = |message: String| RecordFileError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => parse_error("file is not valid UTF-8".to_string()),
        _ => io_error(path)(e),
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&text).map_err(|e| parse_error(e.to_string())),
        Some("json") => serde_json::from_str(&text).map_err(|e| parse_error(e.to_string())),
        _ => Err(RecordFileError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load the avatar at `path`, named after its file name.
///
/// Files larger than `max_bytes` are not read: the result carries the
/// on-disk size and no content, which validation rejects.
pub fn load_avatar(path: &Path, max_bytes: u64) -> Result<AvatarFile, RecordFileError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let size = std::fs::metadata(path).map_err(io_error(path))?.len();
    if size > max_bytes {
        debug!(path = %path.display(), size, max_bytes, "Avatar exceeds size limit, not reading it");
        return Ok(AvatarFile {
            name,
            size,
            content: Vec::new(),
        });
    }

    let content = std::fs::read(path).map_err(io_error(path))?;
    Ok(AvatarFile::new(name, content))
}

/// Load a candidate record; a missing avatar file is an error, an absent
/// `avatar` entry is not (validation reports it). Avatars above
/// `max_avatar_bytes` are sized but not read.
pub fn load_candidate(path: &Path, max_avatar_bytes: u64) -> Result<CandidateRecord, RecordFileError> {
    let record = parse(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let avatar = match record.avatar {
        Some(avatar_path) => Some(load_avatar(&base.join(avatar_path), max_avatar_bytes)?),
        None => None,
    };

    Ok(CandidateRecord {
        avatar,
        name: record.name,
        email: record.email,
        password: record.password,
        techs: record.techs,
    })
}
