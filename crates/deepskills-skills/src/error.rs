//! Error types for skill discovery and loading

use thiserror::Error;

/// Skill pipeline errors
///
/// Missing `name`/`description` is not an error: the parser reports it as
/// `Ok(None)` so scans can skip such descriptors quietly.
#[derive(Debug, Error)]
pub enum SkillError {
    /// Front matter delimiters missing
    #[error("Malformed descriptor: {reason}")]
    MalformedDescriptor {
        /// Which delimiter was missing
        reason: String,
    },

    /// Front matter present but not a valid YAML mapping
    #[error("Failed to decode YAML frontmatter: {0}")]
    Decode(String),

    /// File larger than the configured bound
    #[error("Skill file '{path}' too large ({size} bytes, limit {limit})")]
    SizeExceeded {
        /// Offending file
        path: String,
        /// Actual size in bytes
        size: u64,
        /// Allowed size in bytes
        limit: u64,
    },

    /// Requested path does not resolve to an existing file
    #[error("Skill file '{path}' not found")]
    NotFound {
        /// Requested path
        path: String,
    },

    /// Requested path is empty, absolute or climbs out with `..`
    #[error("Invalid skill path '{path}': {reason}")]
    InvalidPath {
        /// Requested path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// Resolved location lies outside the skill root
    #[error("Skill path '{path}' escapes the skills root")]
    PathEscapesRoot {
        /// Requested path
        path: String,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            reason: reason.into(),
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillError>;
