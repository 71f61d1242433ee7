use anyhow::{anyhow, Result};
use log::info;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Settings for the remote text-generation endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AssistantConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl AssistantConfig {
    pub fn new(api_key: &str) -> Self {
        AssistantConfig {
            api_key: api_key.to_string(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }

    /// Build a config from environment variables. `PALAVER_API_KEY` is
    /// required; `PALAVER_MODEL` and `PALAVER_BASE_URL` override defaults.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("PALAVER_API_KEY").ok()?;
        let mut config = AssistantConfig::new(&api_key);
        if let Ok(model) = std::env::var("PALAVER_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("PALAVER_BASE_URL") {
            config.base_url = base_url;
        }
        Some(config)
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("palaver");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

static CONFIG_PATH_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Point config loading at an explicit file (used by the `--config` flag).
/// Only the first call takes effect.
pub fn set_config_path_override(path: PathBuf) {
    let _ = CONFIG_PATH_OVERRIDE.set(path);
}

fn get_config_path() -> Result<PathBuf> {
    if let Some(path) = CONFIG_PATH_OVERRIDE.get() {
        return Ok(path.clone());
    }
    Ok(get_config_dir()?.join("config.json"))
}

/// Resolve the assistant config without prompting: environment variables
/// win over the config file. `Ok(None)` means neither source provided one.
pub fn resolve_config() -> Result<Option<AssistantConfig>> {
    resolve_config_from(&get_config_path()?)
}

pub fn resolve_config_from(path: &Path) -> Result<Option<AssistantConfig>> {
    if let Some(config) = AssistantConfig::from_env() {
        info!("Using assistant config from environment");
        return Ok(Some(config));
    }

    load_config_from(path)
}

pub fn save_config(config: &AssistantConfig) -> Result<()> {
    save_config_to(&get_config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &AssistantConfig) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;

    info!("Assistant config saved to {}", path.display());
    Ok(())
}

/// Load the assistant config from disk. A missing file is not an error.
pub fn load_config() -> Result<Option<AssistantConfig>> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Option<AssistantConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let config: AssistantConfig = serde_json::from_str(&contents)?;
    info!(
        "Loaded assistant config (model {}) from {}",
        config.model,
        path.display()
    );

    Ok(Some(config))
}
