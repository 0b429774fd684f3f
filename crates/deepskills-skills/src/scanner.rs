//! Skill discovery (Phase 1)
//!
//! Walks the immediate subdirectories of a skills root, reads each
//! `SKILL.md` and keeps the metadata only. Per-file failures are isolated:
//! they are logged and reported, never fatal for the scan.

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::descriptor::{parse_descriptor, SkillMetadata, SKILL_FILE_NAME};
use crate::error::{Result, SkillError};

/// Upper bound for any descriptor read from disk (10 MiB)
pub const MAX_SKILL_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// A candidate descriptor that was found but not turned into metadata
#[derive(Debug)]
pub struct SkippedSkill {
    /// Descriptor location relative to the skills root
    pub path: String,
    /// Why it was skipped
    pub reason: SkillError,
}

/// Outcome of scanning one skills root
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Valid skills in directory enumeration order
    pub skills: Vec<SkillMetadata>,
    /// Descriptors skipped because of malformed input, size or I/O
    pub skipped: Vec<SkippedSkill>,
}

/// Discover all valid skills under `root`.
///
/// A missing root yields an empty list.
pub fn scan_skills(root: &Path) -> Vec<SkillMetadata> {
    scan_skills_with_report(root).skills
}

/// Discover skills under `root`, also reporting every skipped descriptor
pub fn scan_skills_with_report(root: &Path) -> ScanReport {
    let mut report = ScanReport::default();

    if !root.exists() {
        debug!("Skills directory does not exist: {:?}", root);
        return report;
    }

    if !root.is_dir() {
        warn!("Skills path is not a directory: {:?}", root);
        return report;
    }

    let canonical_root = match fs::canonicalize(root) {
        Ok(path) => path,
        Err(e) => {
            warn!("Failed to resolve skills directory {:?}: {}", root, e);
            return report;
        }
    };

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read directory {:?}: {}", root, e);
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read entry in {:?}: {}", root, e);
                continue;
            }
        };

        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let skill_file = dir.join(SKILL_FILE_NAME);
        if !skill_file.is_file() {
            continue;
        }

        let Some(dir_name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!("Skipping {:?}: directory name is not valid UTF-8", dir);
            report.skipped.push(SkippedSkill {
                path: dir.to_string_lossy().into_owned(),
                reason: SkillError::InvalidPath {
                    path: dir.to_string_lossy().into_owned(),
                    reason: "not valid UTF-8".to_string(),
                },
            });
            continue;
        };
        let relative = format!("{dir_name}/{SKILL_FILE_NAME}");

        match read_descriptor(&canonical_root, &skill_file, &relative) {
            Ok(Some(metadata)) => {
                debug!("Discovered skill: {} at {}", metadata.name, relative);
                report.skills.push(metadata);
            }
            Ok(None) => {
                debug!("Skipping {}: missing name or description", relative);
            }
            Err(reason) => {
                warn!("Skipping {}: {}", relative, reason);
                report.skipped.push(SkippedSkill {
                    path: relative,
                    reason,
                });
            }
        }
    }

    info!(
        "Discovered {} skills in {:?} ({} skipped)",
        report.skills.len(),
        root,
        report.skipped.len()
    );
    report
}

/// Gate, read and parse one descriptor
fn read_descriptor(
    canonical_root: &Path,
    skill_file: &Path,
    relative: &str,
) -> Result<Option<SkillMetadata>> {
    let canonical = fs::canonicalize(skill_file)?;
    if !canonical.starts_with(canonical_root) {
        return Err(SkillError::PathEscapesRoot {
            path: relative.to_string(),
        });
    }

    let size = fs::metadata(&canonical)?.len();
    ensure_within_size_limit(relative, size)?;

    let contents = fs::read_to_string(&canonical)?;
    parse_descriptor(&contents, relative)
}

/// Reject sizes above [`MAX_SKILL_FILE_SIZE`]
pub(crate) fn ensure_within_size_limit(path: &str, size: u64) -> Result<()> {
    if size > MAX_SKILL_FILE_SIZE {
        return Err(SkillError::SizeExceeded {
            path: path.to_string(),
            size,
            limit: MAX_SKILL_FILE_SIZE,
        });
    }
    Ok(())
}
