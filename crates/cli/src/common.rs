use clap::Args;
use std::path::PathBuf;

use opdecl_core::{GeneratorConfig, ManifestRegistry, generate};

/// Inputs shared by every command that runs the generator.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Registry manifest describing the operation class tree (.json, .yaml, .toml)
    #[arg(long = "registry", short = 'r', value_name = "FILE")]
    pub registry: PathBuf,

    /// Generator configuration (TOML). Defaults apply when omitted.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl InputArgs {
    /// Load the registry and the configuration.
    pub fn load(&self) -> Result<(ManifestRegistry, GeneratorConfig), String> {
        let registry = ManifestRegistry::load(&self.registry).map_err(|err| err.to_string())?;
        let config = GeneratorConfig::load(self.config.as_deref()).map_err(|err| err.to_string())?;
        Ok((registry, config))
    }

    /// Generate all declarations in memory, as one `\n`-terminated text.
    pub fn render(&self) -> Result<String, String> {
        let (registry, config) = self.load()?;
        let mut lines: Vec<String> = Vec::new();
        generate(&registry, &config, &mut lines).map_err(|err| err.to_string())?;
        Ok(join_lines(&lines))
    }
}

/// Join declaration lines into file contents.
pub fn join_lines(lines: &[String]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
