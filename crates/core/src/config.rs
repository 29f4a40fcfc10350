use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_CONFIG_PATH: &str = "LARDER_CONFIG";
pub const ENV_DB_PATH: &str = "LARDER_DB_PATH";
pub const ENV_SPOONACULAR_API_KEY: &str = "SPOONACULAR_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecipeProviderKind {
    #[default]
    Spoonacular,
    MealDb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeConfig {
    pub provider: RecipeProviderKind,
    pub api_key: Option<String>,
    /// Overrides the provider's public endpoint (used by tests and proxies).
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            provider: RecipeProviderKind::default(),
            api_key: None,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroceryConfig {
    /// TOML flyer/price catalog; the built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LarderConfig {
    pub db_path: Option<PathBuf>,
    pub recipes: RecipeConfig,
    pub grocery: GroceryConfig,
}

impl LarderConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Read `path` if it exists, otherwise start from defaults; then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content)?
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            self.db_path = Some(PathBuf::from(db));
        }
        if self.recipes.api_key.is_none() {
            self.recipes.api_key = lookup(ENV_SPOONACULAR_API_KEY).filter(|v| !v.trim().is_empty());
        }
    }
}
