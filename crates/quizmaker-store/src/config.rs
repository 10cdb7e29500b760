//! Store configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizmaker_core::traits::QuizStore;

use crate::json::JsonFileStore;
use crate::memory::InMemoryStore;

/// Which backend keeps tests, questions, and results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Json {
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
    /// Nothing survives the process.
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./quizmaker-data.json")
}

/// Top-level quizmaker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizmakerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Subject line of result emails.
    #[serde(default = "default_email_subject")]
    pub email_subject: String,
}

fn default_email_subject() -> String {
    "Test result".to_string()
}

impl Default for QuizmakerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            email_subject: default_email_subject(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::Json { path } => StoreConfig::Json {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        StoreConfig::Memory => StoreConfig::Memory,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizmaker.toml` in the current directory
/// 2. `~/.config/quizmaker/config.toml`
///
/// Environment variable override: `QUIZMAKER_STORE` (path of the JSON store).
pub fn load_config() -> Result<QuizmakerConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmakerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmaker.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizmakerConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizmakerConfig::default(),
    };

    if let Ok(store_path) = std::env::var("QUIZMAKER_STORE") {
        config.store = StoreConfig::Json {
            path: PathBuf::from(store_path),
        };
    }
    config.store = resolve_store_config(&config.store);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmaker"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn QuizStore>> {
    match config {
        StoreConfig::Json { path } => {
            tracing::debug!("opening JSON store at {}", path.display());
            Ok(Box::new(JsonFileStore::open(path)?))
        }
        StoreConfig::Memory => Ok(Box::new(InMemoryStore::new())),
    }
}
