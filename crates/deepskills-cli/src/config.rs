use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SkillsConfig {
    /// Skills roots, lowest precedence first; empty means the personal
    /// root followed by the project root
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(default)]
    pub body_only: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Global config path: ~/.deepskills/deepskills.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".deepskills").join("deepskills.toml"))
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.deepskills/deepskills.toml (optional)
    /// 2. Local override: ./deepskills.toml (optional)
    /// 3. Environment variables with DEEPSKILLS__ prefix
    /// 4. DEEPSKILLS_SKILLS_DIR / DEEPSKILLS_LOG_LEVEL (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut config_builder = config::Config::builder();

        if let Some(global_config_path) = Self::global_config_path() {
            config_builder =
                config_builder.add_source(config::File::from(global_config_path).required(false));
        }

        config_builder = config_builder
            .add_source(config::File::with_name("deepskills").required(false))
            .add_source(
                config::Environment::with_prefix("DEEPSKILLS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("skills.directories")
                    .try_parsing(true),
            );

        if let Ok(dir) = env::var("DEEPSKILLS_SKILLS_DIR") {
            config_builder = config_builder.set_override("skills.directories", vec![dir])?;
        }

        if let Ok(level) = env::var("DEEPSKILLS_LOG_LEVEL") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let config = config_builder.build()?;

        let config: Self = config.try_deserialize()?;
        Ok(config)
    }

    /// Configured skills roots with `~` expanded to the home directory
    pub fn skill_directories(&self) -> Vec<PathBuf> {
        self.skills
            .directories
            .iter()
            .map(|dir| expand_home(dir))
            .collect()
    }
}

fn expand_home(dir: &str) -> PathBuf {
    let rest = match dir.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(dir),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(dir),
    }
}
