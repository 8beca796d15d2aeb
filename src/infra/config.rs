// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::paths;
use crate::provider::retry::RetryPolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub evolution: EvolutionConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Template overrides; unset fields fall back to the built-in prompts.
    #[serde(default)]
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gpt-3.5-turbo".into(),
            temperature: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub epochs: u32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self { epochs: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub min_wait_secs: f64,
    pub max_wait_secs: f64,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 120,
            min_wait_secs: 10.0,
            max_wait_secs: 100.0,
            multiplier: 1.0,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> anyhow::Result<RetryPolicy> {
        if self.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }
        if self.min_wait_secs < 0.0 || self.max_wait_secs < self.min_wait_secs {
            anyhow::bail!(
                "retry waits must satisfy 0 <= min_wait_secs <= max_wait_secs (got {} and {})",
                self.min_wait_secs,
                self.max_wait_secs
            );
        }
        if !(self.multiplier >= 0.0) {
            anyhow::bail!("retry.multiplier must be a non-negative number");
        }
        Ok(RetryPolicy {
            max_attempts: self.max_attempts,
            min_wait: Duration::try_from_secs_f64(self.min_wait_secs)?,
            max_wait: Duration::try_from_secs_f64(self.max_wait_secs)?,
            multiplier: self.multiplier,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    /// JSON file backing the response cache. Defaults to the platform cache dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub depth: Option<Vec<String>>,
    #[serde(default)]
    pub breadth: Option<String>,
    #[serde(default)]
    pub equal: Option<String>,
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match paths::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
