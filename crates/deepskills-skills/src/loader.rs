//! On-demand skill content loading (Phase 2)
//!
//! Paths come from the metadata advertised in the system prompt and are
//! always resolved against the skills root. Failures are returned to the
//! caller; nothing is skipped silently.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::descriptor::{extract_body, SKILL_FILE_NAME};
use crate::error::{Result, SkillError};
use crate::scanner::ensure_within_size_limit;

/// Full content of one skill, loaded on request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDocument {
    /// Path the content was requested with
    pub path: String,
    /// Descriptor text (with or without frontmatter, see [`LoadMode`])
    pub content: String,
}

/// What part of a descriptor the loader returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// The file as-is, frontmatter included
    #[default]
    Full,
    /// Only the instructions after the frontmatter
    BodyOnly,
}

/// Loads skill documents relative to a skills root
#[derive(Debug, Clone)]
pub struct SkillContextLoader {
    root: PathBuf,
    mode: LoadMode,
}

impl SkillContextLoader {
    /// Create a loader returning full descriptors
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: LoadMode::Full,
        }
    }

    /// Set the load mode
    #[must_use]
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Load one document
    pub fn load(&self, relative: &str) -> Result<SkillDocument> {
        let resolved = resolve_under_root(&self.root, relative)?;

        let size = fs::metadata(&resolved)?.len();
        ensure_within_size_limit(relative, size)?;

        let raw = fs::read_to_string(&resolved)?;
        let content = match self.mode {
            LoadMode::Full => raw,
            LoadMode::BodyOnly => extract_body(&raw)?.to_string(),
        };

        debug!("Loaded skill content from {} ({} bytes)", relative, size);
        Ok(SkillDocument {
            path: relative.to_string(),
            content,
        })
    }

    /// Load several documents in order, failing on the first bad path
    pub fn load_many<I, S>(&self, paths: I) -> Result<Vec<SkillDocument>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|path| self.load(path.as_ref()))
            .collect()
    }
}

/// Load the full descriptor at `relative` under `root`
pub fn load_content(root: &Path, relative: &str) -> Result<SkillDocument> {
    SkillContextLoader::new(root).load(relative)
}

/// Load full descriptors for all `paths`, preserving order
pub fn load_many<I, S>(root: &Path, paths: I) -> Result<Vec<SkillDocument>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SkillContextLoader::new(root).load_many(paths)
}

/// List the files shipped next to a skill's descriptor.
///
/// `skill_path` is the descriptor path from the metadata. Returns paths
/// relative to `root`, `/` separated and sorted; the descriptor itself and
/// subdirectories are left out.
pub fn list_supporting_files(root: &Path, skill_path: &str) -> Result<Vec<String>> {
    let descriptor = resolve_under_root(root, skill_path)?;
    let Some(skill_dir) = descriptor.parent() else {
        return Ok(Vec::new());
    };

    let prefix = normalize_relative_path(skill_path)?
        .parent()
        .map(path_to_slash)
        .unwrap_or_default();

    let mut files = Vec::new();
    for entry in fs::read_dir(skill_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if name == SKILL_FILE_NAME {
            continue;
        }
        files.push(if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        });
    }

    files.sort();
    Ok(files)
}

/// Reject empty, absolute and parent-climbing paths
fn normalize_relative_path(relative: &str) -> Result<PathBuf> {
    let invalid = |reason: &str| SkillError::InvalidPath {
        path: relative.to_string(),
        reason: reason.to_string(),
    };

    if relative.trim().is_empty() {
        return Err(invalid("empty"));
    }

    let raw = Path::new(relative);
    if raw.is_absolute() {
        return Err(invalid("absolute"));
    }

    let mut out = PathBuf::new();
    for component in raw.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return Err(invalid("absolute")),
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("parent directory reference")),
            Component::Normal(segment) => out.push(segment),
        }
    }

    if out.as_os_str().is_empty() {
        return Err(invalid("empty"));
    }
    Ok(out)
}

/// Resolve `relative` to an existing file inside `root`
fn resolve_under_root(root: &Path, relative: &str) -> Result<PathBuf> {
    let rel = normalize_relative_path(relative)?;
    let not_found = || SkillError::NotFound {
        path: relative.to_string(),
    };

    let root = fs::canonicalize(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => SkillError::Io(e),
    })?;
    let resolved = fs::canonicalize(root.join(&rel)).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => SkillError::Io(e),
    })?;

    if !resolved.starts_with(&root) {
        return Err(SkillError::PathEscapesRoot {
            path: relative.to_string(),
        });
    }
    if !resolved.is_file() {
        return Err(not_found());
    }
    Ok(resolved)
}

fn path_to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
