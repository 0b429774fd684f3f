//! Skill descriptor parsing
//!
//! Each skill is a folder containing SKILL.md: a `---` fenced YAML
//! frontmatter block followed by free-form Markdown instructions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::num::FpCategory;
use tracing::{debug, warn};

use crate::error::{Result, SkillError};

/// Conventional descriptor file name inside each skill directory
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// Frontmatter fence line
const DELIMITER: &str = "---";
/// Recommended maximum name length
const MAX_NAME_LENGTH: usize = 64;
/// Recommended maximum description length
const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Skill metadata exposed to the model before any content is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMetadata {
    /// Skill name
    pub name: String,
    /// What the skill does and when to use it
    pub description: String,
    /// Descriptor location relative to the skills root, `/` separated
    pub path: String,
}

impl SkillMetadata {
    /// Render the two prompt lines advertising this skill
    #[must_use]
    pub fn to_prompt_entry(&self) -> String {
        format!(
            "- **{}**: {}\n  -> Read `{}` for full instructions",
            self.name, self.description, self.path
        )
    }
}

/// Borrowed split of a descriptor into frontmatter and body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Raw YAML between the fences
    pub yaml: &'a str,
    /// Everything after the closing fence
    pub body: &'a str,
}

/// Split a descriptor at its `---` fences.
///
/// The opening fence must be the first line. Fails with
/// [`SkillError::MalformedDescriptor`] rather than guessing when either fence
/// is missing.
pub fn split_front_matter(contents: &str) -> Result<FrontMatter<'_>> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut lines = contents.split_inclusive('\n');

    let first = lines.next().unwrap_or_default();
    if first.trim_end() != DELIMITER {
        return Err(SkillError::malformed("missing opening '---' delimiter"));
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Ok(FrontMatter {
                yaml: &contents[yaml_start..offset],
                body: &contents[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    Err(SkillError::malformed("missing closing '---' delimiter"))
}

/// Return the instruction body of a descriptor, without frontmatter
pub fn extract_body(contents: &str) -> Result<&str> {
    let split = split_front_matter(contents)?;
    Ok(split.body.trim_start_matches(['\r', '\n']))
}

/// Parse one descriptor into metadata.
///
/// `path` is supplied by the caller and copied into the result as-is.
/// Returns `Ok(None)` when `name` or `description` is absent or empty; all
/// other frontmatter keys are ignored.
pub fn parse_descriptor(contents: &str, path: &str) -> Result<Option<SkillMetadata>> {
    let split = split_front_matter(contents)?;
    let mapping = decode_front_matter(split.yaml)?;

    let (Some(name), Some(description)) = (
        scalar_field(&mapping, "name"),
        scalar_field(&mapping, "description"),
    ) else {
        debug!("Descriptor {} has no name or description", path);
        return Ok(None);
    };

    let metadata = SkillMetadata {
        name,
        description,
        path: path.to_string(),
    };
    check_conventions(&metadata);
    Ok(Some(metadata))
}

/// Decode frontmatter into a generic mapping; empty frontmatter is an empty mapping
fn decode_front_matter(yaml: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| SkillError::Decode(e.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(SkillError::Decode(format!(
            "frontmatter must be a mapping, found {}",
            value_kind(&other)
        ))),
    }
}

/// Project a scalar field to trimmed text.
///
/// Non-scalars, blanks, `false` and zero count as absent.
fn scalar_field(mapping: &Mapping, key: &str) -> Option<String> {
    let text = match mapping.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) if n.as_f64().is_some_and(|f| f.classify() == FpCategory::Zero) => {
            return None
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Warn about metadata that departs from the naming conventions.
/// Such skills are still accepted.
fn check_conventions(metadata: &SkillMetadata) {
    if metadata.name.chars().count() > MAX_NAME_LENGTH {
        warn!(
            "Skill name '{}' exceeds {} characters (was {})",
            metadata.name,
            MAX_NAME_LENGTH,
            metadata.name.chars().count()
        );
    }

    match Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$") {
        Ok(name_re) if !name_re.is_match(&metadata.name) => {
            warn!(
                "Skill name '{}' should contain only lowercase letters, numbers, and hyphens",
                metadata.name
            );
        }
        Ok(_) => {}
        Err(e) => debug!("Failed to compile name validation regex: {}", e),
    }

    if metadata.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        warn!(
            "Skill '{}' description exceeds {} characters (was {})",
            metadata.name,
            MAX_DESCRIPTION_LENGTH,
            metadata.description.chars().count()
        );
    }
}
