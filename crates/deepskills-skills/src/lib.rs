//! `DeepSkills` Skills System
//!
//! Progressive disclosure of skill documents for a language-model agent.
//!
//! ## Features
//!
//! - SKILL.md descriptors with YAML frontmatter (name, description)
//! - Discovery of one skill per subdirectory of a skills root
//! - Size gating and root containment for every file read
//! - System prompt section listing each skill and where to read it
//! - On-demand loading of full descriptors or instruction bodies
//!
//! ## Architecture
//!
//! Phase 1 (Discovery): scan the root, keep only name, description and path
//! Phase 2 (Activation): when a skill is selected, load its full content
//! Phase 3 (Context): merge the loaded documents into one payload
//!
//! Selecting a skill is left to the model or the caller.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod context;
pub mod descriptor;
pub mod error;
pub mod library;
pub mod loader;
pub mod prompt;
pub mod scanner;

pub use context::merge_context;
pub use descriptor::{
    extract_body, parse_descriptor, split_front_matter, FrontMatter, SkillMetadata, SKILL_FILE_NAME,
};
pub use error::{Result, SkillError};
pub use library::{RootScan, SkillLibrary};
pub use loader::{
    list_supporting_files, load_content, load_many, LoadMode, SkillContextLoader, SkillDocument,
};
pub use prompt::{build_metadata_prompt, build_multi_root_prompt};
pub use scanner::{
    scan_skills, scan_skills_with_report, ScanReport, SkippedSkill, MAX_SKILL_FILE_SIZE,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        build_metadata_prompt, load_content, load_many, merge_context, scan_skills, LoadMode,
        SkillDocument, SkillError, SkillLibrary, SkillMetadata,
    };
}
