mod config;
mod service;

use anyhow::Result;
use crate::config::Config;
use crate::service::SkillsService;

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Remaining arguments are skill paths to load after the prompt
    let requested: Vec<String> = std::env::args().skip(1).collect();

    SkillsService::new(config, requested).run()
}
