//! Skills library over one or more skills roots
//!
//! Holds configuration only. Every call re-scans or re-reads the
//! filesystem, so results always reflect the current state of the roots.
//!
//! Roots are ordered by precedence: a descriptor path present in a later
//! root shadows the same relative path in every earlier root. Each
//! advertised path therefore resolves to exactly one skill.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::context::merge_context;
use crate::descriptor::SkillMetadata;
use crate::error::{Result, SkillError};
use crate::loader::{list_supporting_files, LoadMode, SkillContextLoader, SkillDocument};
use crate::prompt::build_multi_root_prompt;
use crate::scanner::{scan_skills_with_report, ScanReport};

/// Skills directory, relative to the home or working directory
const SKILLS_SUBDIR: [&str; 2] = [".deepskills", "skills"];

/// Scan result of one configured root
#[derive(Debug)]
pub struct RootScan {
    /// The skills root
    pub root: PathBuf,
    /// What was found there; `skills` holds only unshadowed entries
    pub report: ScanReport,
    /// Valid skills hidden by the same path in a later root
    pub shadowed: Vec<SkillMetadata>,
}

/// Progressive disclosure entry point bound to a set of skills roots
#[derive(Debug, Clone, Default)]
pub struct SkillLibrary {
    /// Skills roots, lowest precedence first
    directories: Vec<PathBuf>,
    /// Content returned by `load`
    mode: LoadMode,
}

impl SkillLibrary {
    /// Create a library without roots
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skills root, taking precedence over the roots added before it
    #[must_use]
    pub fn add_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Add `~/.deepskills/skills`; skipped when there is no home directory
    #[must_use]
    pub fn with_personal_skills(self) -> Self {
        match dirs::home_dir() {
            Some(home) => self.add_directory(skills_dir_under(&home)),
            None => {
                warn!("No home directory, personal skills root not added");
                self
            }
        }
    }

    /// Add `./.deepskills/skills`
    #[must_use]
    pub fn with_project_skills(self) -> Self {
        self.add_directory(skills_dir_under(Path::new(".")))
    }

    /// Choose between full descriptors and instruction bodies
    #[must_use]
    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Configured roots
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Scan every root (Phase 1: Discovery), in configured order
    #[must_use]
    pub fn scan(&self) -> Vec<RootScan> {
        info!(
            "Starting skills discovery in {} directories",
            self.directories.len()
        );

        self.directories
            .iter()
            .enumerate()
            .map(|(index, root)| {
                let mut report = scan_skills_with_report(root);
                let later = &self.directories[index + 1..];
                let (shadowed, visible): (Vec<_>, Vec<_>) = report
                    .skills
                    .into_iter()
                    .partition(|skill| later.iter().any(|dir| dir.join(&skill.path).is_file()));
                for skill in &shadowed {
                    debug!("Skill {} in {:?} shadowed by a later root", skill.path, root);
                }
                report.skills = visible;
                RootScan {
                    root: root.clone(),
                    report,
                    shadowed,
                }
            })
            .collect()
    }

    /// Metadata of all unshadowed skills, in root then enumeration order
    #[must_use]
    pub fn metadata(&self) -> Vec<SkillMetadata> {
        self.scan()
            .into_iter()
            .flat_map(|scan| scan.report.skills)
            .collect()
    }

    /// Skills section for the system prompt
    #[must_use]
    pub fn metadata_prompt(&self) -> String {
        let roots: Vec<(PathBuf, Vec<SkillMetadata>)> = self
            .scan()
            .into_iter()
            .map(|scan| (scan.root, scan.report.skills))
            .collect();
        build_multi_root_prompt(&roots)
    }

    /// Load one skill document (Phase 2: Activation).
    ///
    /// The path resolves against the last root holding the file, the same
    /// root `scan` advertises it from.
    pub fn load(&self, path: &str) -> Result<SkillDocument> {
        for root in self.directories.iter().rev() {
            match self.loader(root).load(path) {
                Err(SkillError::NotFound { .. }) => {
                    debug!("Skill file {} not under {:?}", path, root);
                }
                result => return result,
            }
        }

        Err(SkillError::NotFound {
            path: path.to_string(),
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

    /// Load several documents and merge them into one context payload
    pub fn load_context<I, S>(&self, paths: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(merge_context(&self.load_many(paths)?))
    }

    /// Files shipped next to a skill's descriptor, from the root `load` uses
    pub fn supporting_files(&self, path: &str) -> Result<Vec<String>> {
        for root in self.directories.iter().rev() {
            match list_supporting_files(root, path) {
                Err(SkillError::NotFound { .. }) => continue,
                result => return result,
            }
        }

        Err(SkillError::NotFound {
            path: path.to_string(),
        })
    }

    fn loader(&self, root: &Path) -> SkillContextLoader {
        SkillContextLoader::new(root).with_mode(self.mode)
    }
}

fn skills_dir_under(base: &Path) -> PathBuf {
    SKILLS_SUBDIR.iter().fold(base.to_path_buf(), |dir, part| dir.join(part))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_skill(root: &Path, dir: &str, name: &str) {
        let skill_dir = root.join(dir);
        fs::create_dir_all(&skill_dir).unwrap();
        fs::write(
            skill_dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: {name} skill\n---\n\n# {name} body\n"),
        )
        .unwrap();
    }

    #[test]
    fn test_library_new() {
        let library = SkillLibrary::new();
        assert!(library.directories().is_empty());
        assert!(library.metadata().is_empty());
    }

    #[test]
    fn test_library_empty_prompt_keeps_template() {
        let prompt = SkillLibrary::new().metadata_prompt();
        assert!(prompt.contains("**Available Skills:**"));
    }

    #[test]
    fn test_library_scans_roots_in_order() {
        let personal = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_skill(personal.path(), "a", "alpha");
        write_skill(project.path(), "b", "beta");

        let library = SkillLibrary::new()
            .add_directory(personal.path())
            .add_directory(project.path());

        let names: Vec<String> = library.metadata().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["alpha", "beta"]);

        let prompt = library.metadata_prompt();
        assert!(prompt.find("a/SKILL.md").unwrap() < prompt.find("b/SKILL.md").unwrap());
    }

    #[test]
    fn test_library_load_falls_through_roots() {
        let personal = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_skill(project.path(), "b", "beta");

        let library = SkillLibrary::new()
            .add_directory(personal.path())
            .add_directory(project.path())
            .with_load_mode(LoadMode::BodyOnly);

        let doc = library.load("b/SKILL.md").unwrap();
        assert_eq!(doc.content, "# beta body\n");

        let err = library.load("zzz/SKILL.md").unwrap_err();
        assert!(matches!(err, SkillError::NotFound { .. }));
    }

    #[test]
    fn test_library_does_not_cache() {
        let td = TempDir::new().unwrap();
        let library = SkillLibrary::new().add_directory(td.path());
        assert!(library.metadata().is_empty());

        write_skill(td.path(), "late", "late");
        assert_eq!(library.metadata().len(), 1);
    }

    #[test]
    fn test_library_load_context() {
        let td = TempDir::new().unwrap();
        write_skill(td.path(), "a", "alpha");
        write_skill(td.path(), "b", "beta");

        let library = SkillLibrary::new().add_directory(td.path());
        let context = library.load_context(["b/SKILL.md", "a/SKILL.md"]).unwrap();
        assert!(context.find("beta body").unwrap() < context.find("alpha body").unwrap());
    }

    fn write_file(root: &Path, path: &str, content: &str) {
        let file = root.join(path);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, content).unwrap();
    }

    #[test]
    fn test_later_root_shadows_same_path() {
        let personal = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_file(
            personal.path(),
            "summarize/SKILL.md",
            "---\nname: summarize\ndescription: personal\n---\nPERSONAL BODY\n",
        );
        write_file(
            project.path(),
            "summarize/SKILL.md",
            "---\nname: summarize\ndescription: project\n---\nPROJECT BODY\n",
        );

        let library = SkillLibrary::new()
            .add_directory(personal.path())
            .add_directory(project.path());

        let advertised = library.metadata();
        assert_eq!(advertised.len(), 1);
        assert_eq!(advertised[0].description, "project");

        for skill in &advertised {
            let doc = library.load(&skill.path).unwrap();
            assert!(doc.content.contains("PROJECT BODY"));
        }

        let scans = library.scan();
        assert_eq!(scans[0].shadowed.len(), 1);
        assert!(scans[0].report.skills.is_empty());
        assert!(scans[1].shadowed.is_empty());

        let prompt = library.metadata_prompt();
        assert_eq!(prompt.matches("summarize/SKILL.md").count(), 1);
        assert!(!prompt.contains("personal"));
    }

    #[test]
    fn test_invalid_later_descriptor_still_shadows() {
        let personal = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_skill(personal.path(), "summarize", "summarize");
        write_file(project.path(), "summarize/SKILL.md", "no frontmatter");

        let library = SkillLibrary::new()
            .add_directory(personal.path())
            .add_directory(project.path());

        assert!(library.metadata().is_empty());
    }

    #[test]
    fn test_default_roots() {
        let library = SkillLibrary::new()
            .with_personal_skills()
            .with_project_skills();

        let project = library.directories().last().unwrap();
        assert_eq!(project, &Path::new(".").join(".deepskills").join("skills"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(library.directories().len(), 2);
            assert_eq!(library.directories()[0], home.join(".deepskills").join("skills"));
        }
    }

    #[test]
    fn test_supporting_files_follow_precedence() {
        let personal = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_skill(personal.path(), "report", "report");
        write_file(personal.path(), "report/personal.py", "");
        write_skill(project.path(), "report", "report");
        write_file(project.path(), "report/template.md", "");
        write_skill(personal.path(), "solo", "solo");
        write_file(personal.path(), "solo/notes.txt", "");

        let library = SkillLibrary::new()
            .add_directory(personal.path())
            .add_directory(project.path());

        assert_eq!(
            library.supporting_files("report/SKILL.md").unwrap(),
            vec!["report/template.md"]
        );
        assert_eq!(
            library.supporting_files("solo/SKILL.md").unwrap(),
            vec!["solo/notes.txt"]
        );
        assert!(matches!(
            library.supporting_files("missing/SKILL.md").unwrap_err(),
            SkillError::NotFound { .. }
        ));
    }
}
