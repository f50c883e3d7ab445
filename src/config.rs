use crate::llm::prompts::{DEFAULT_PROMPT, DEFAULT_TEMPLATE};
use crate::llm::selector::Endpoints;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Final resolved configuration for one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationConfig {
    pub model: String,
    pub prompt: String,
    pub template: String,
    pub pretty_print: bool,
    pub timeout_secs: u64,
    pub endpoints: Endpoints,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            pretty_print: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
        }
    }
}

impl GenerationConfig {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flag (`--model`)
    ///   2. Env var `PROPR_MODEL`
    ///   3. TOML `~/.config/propr.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(model_cli: Option<String>) -> Result<Self> {
        let file_cfg = match config_path() {
            Some(path) => load_file_config(&path)?.unwrap_or_default(),
            None => FileConfig::default(),
        };
        let model_env = env::var("PROPR_MODEL").ok().filter(|m| !m.trim().is_empty());

        Ok(Self::resolve(model_cli, model_env, file_cfg))
    }

    pub fn resolve(model_cli: Option<String>, model_env: Option<String>, file_cfg: FileConfig) -> Self {
        let defaults = GenerationConfig::default();

        let model = model_cli
            .or(model_env)
            .or(file_cfg.model)
            .unwrap_or(defaults.model);

        GenerationConfig {
            model,
            prompt: file_cfg.prompt.unwrap_or(defaults.prompt),
            template: file_cfg.template.unwrap_or(defaults.template),
            pretty_print: file_cfg.pretty_print.unwrap_or(defaults.pretty_print),
            timeout_secs: file_cfg
                .timeout_secs
                .filter(|s| *s > 0)
                .unwrap_or(defaults.timeout_secs),
            endpoints: file_cfg.endpoints.unwrap_or(defaults.endpoints),
        }
    }

    /// How long the provider gets to answer.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// What `~/.config/propr.toml` may contain. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub prompt: Option<String>,
    /// Markdown skeleton the description must follow.
    pub template: Option<String>,
    pub pretty_print: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub endpoints: Option<Endpoints>,
}

impl From<&GenerationConfig> for FileConfig {
    fn from(cfg: &GenerationConfig) -> Self {
        FileConfig {
            model: Some(cfg.model.clone()),
            prompt: Some(cfg.prompt.clone()),
            template: Some(cfg.template.clone()),
            pretty_print: Some(cfg.pretty_print),
            timeout_secs: Some(cfg.timeout_secs),
            endpoints: Some(cfg.endpoints.clone()),
        }
    }
}

/// Return `~/.config/propr.toml`
pub fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("propr.toml"))
}

pub fn load_file_config(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let cfg = toml::from_str::<FileConfig>(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(Some(cfg))
}

/// Write the default configuration unless a file already exists. Returns whether it wrote one.
pub fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let data = toml::to_string_pretty(&FileConfig::from(&GenerationConfig::default()))
        .context("failed to encode default config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cli_beats_env_beats_file() {
        let file_cfg = FileConfig {
            model: Some("deepseek-chat".to_string()),
            ..FileConfig::default()
        };

        let cfg = GenerationConfig::resolve(
            Some("o3-mini".to_string()),
            Some("gpt-4o-mini".to_string()),
            file_cfg.clone(),
        );
        assert_eq!(cfg.model, "o3-mini");

        let cfg = GenerationConfig::resolve(None, Some("gpt-4o-mini".to_string()), file_cfg.clone());
        assert_eq!(cfg.model, "gpt-4o-mini");

        let cfg = GenerationConfig::resolve(None, None, file_cfg);
        assert_eq!(cfg.model, "deepseek-chat");
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let cfg = GenerationConfig::resolve(None, None, FileConfig::default());
        assert_eq!(cfg, GenerationConfig::default());
        assert_eq!(cfg.deadline(), Duration::from_secs(300));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let file_cfg = FileConfig {
            timeout_secs: Some(0),
            ..FileConfig::default()
        };
        let cfg = GenerationConfig::resolve(None, None, file_cfg);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn toml_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("propr.toml");
        fs::write(
            &path,
            r##"
model = "claude-3-5-haiku-latest"
template = """
## Summary

## Testing
"""
pretty_print = false

[endpoints]
anthropic = "http://localhost:9000/v1"
"##,
        )
        .unwrap();

        let file_cfg = load_file_config(&path).unwrap().unwrap();
        let cfg = GenerationConfig::resolve(None, None, file_cfg);

        assert_eq!(cfg.model, "claude-3-5-haiku-latest");
        assert_eq!(cfg.template, "## Summary\n\n## Testing\n");
        assert!(!cfg.pretty_print);
        assert_eq!(cfg.endpoints.anthropic, "http://localhost:9000/v1");
        assert_eq!(cfg.endpoints.openai, crate::llm::openai::DEFAULT_BASE_URL);
        assert_eq!(cfg.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        assert_eq!(load_file_config(&dir.path().join("nope.toml")).unwrap(), None);
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("propr.toml");
        fs::write(&path, "model = [").unwrap();

        let err = load_file_config(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn default_config_round_trips_and_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("propr.toml");

        assert!(write_default_config(&path).unwrap());
        let written = load_file_config(&path).unwrap().unwrap();
        assert_eq!(
            GenerationConfig::resolve(None, None, written),
            GenerationConfig::default()
        );

        fs::write(&path, "model = \"o1\"\n").unwrap();
        assert!(!write_default_config(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "model = \"o1\"\n");
    }

    #[test]
    fn env_model_is_read_by_from_sources() {
        let home = tempdir().unwrap();
        let _guard = env_lock::lock_env([
            ("PROPR_MODEL", Some("deepseek-reasoner")),
            ("HOME", home.path().to_str()),
        ]);

        let cfg = GenerationConfig::from_sources(None).unwrap();
        assert_eq!(cfg.model, "deepseek-reasoner");
    }
}
