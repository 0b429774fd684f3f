use crate::config::Config;
use anyhow::{Context, Result};
use deepskills_skills::{build_multi_root_prompt, LoadMode, SkillLibrary, SkillMetadata};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Demo driver: advertise skills, then load the requested ones
pub struct SkillsService {
    config: Config,
    requested: Vec<String>,
}

impl SkillsService {
    /// Create a new service
    pub fn new(config: Config, requested: Vec<String>) -> Self {
        Self { config, requested }
    }

    /// Run the demo
    pub fn run(self) -> Result<()> {
        // Initialize logging
        if self.config.logging.json {
            deepskills_logging::init_logging_json(&self.config.logging.level)?;
        } else {
            deepskills_logging::init_logging(&self.config.logging.level)?;
        }
        info!("Starting DeepSkills");

        let library = self.library();

        // Phase 1: metadata only
        let roots: Vec<(PathBuf, Vec<SkillMetadata>)> = library
            .scan()
            .into_iter()
            .map(|scan| {
                for skipped in &scan.report.skipped {
                    warn!("Skipped {} in {:?}: {}", skipped.path, scan.root, skipped.reason);
                }
                for shadowed in &scan.shadowed {
                    info!("Skill {} in {:?} overridden by a later root", shadowed.path, scan.root);
                }
                (scan.root, scan.report.skills)
            })
            .collect();

        let total: usize = roots.iter().map(|(_, skills)| skills.len()).sum();
        info!("Discovered {} skills in {} roots", total, roots.len());

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", build_multi_root_prompt(&roots))?;

        if self.requested.is_empty() {
            info!("No skills requested, done");
            return Ok(());
        }

        // Phase 2: full content for the requested paths
        let context = library
            .load_context(&self.requested)
            .with_context(|| format!("Failed to load skills {:?}", self.requested))?;
        info!("Loaded {} skill documents", self.requested.len());

        for path in &self.requested {
            match library.supporting_files(path) {
                Ok(files) if !files.is_empty() => {
                    info!("Supporting files for {}: {}", path, files.join(", "));
                }
                Ok(_) => {}
                Err(e) => warn!("Could not list supporting files for {}: {}", path, e),
            }
        }

        writeln!(stdout, "{context}")?;
        Ok(())
    }

    fn library(&self) -> SkillLibrary {
        let mode = if self.config.skills.body_only {
            LoadMode::BodyOnly
        } else {
            LoadMode::Full
        };

        let library = SkillLibrary::new().with_load_mode(mode);
        let directories = self.config.skill_directories();
        if directories.is_empty() {
            return library.with_personal_skills().with_project_skills();
        }

        directories
            .into_iter()
            .fold(library, |library, dir| library.add_directory(dir))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_library_uses_default_roots() {
        let service = SkillsService::new(Config::default(), Vec::new());
        let library = service.library();

        let project = library.directories().last().unwrap();
        assert_eq!(project, &Path::new(".").join(".deepskills").join("skills"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                library.directories(),
                [home.join(".deepskills").join("skills"), project.clone()]
            );
        }
    }

    #[test]
    fn test_library_uses_configured_roots() {
        let mut config = Config::default();
        config.skills.directories = vec!["/opt/skills".to_string(), "local".to_string()];
        let library = SkillsService::new(config, Vec::new()).library();

        assert_eq!(
            library.directories(),
            [PathBuf::from("/opt/skills"), PathBuf::from("local")]
        );
    }
}
