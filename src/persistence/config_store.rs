use super::GlobalConfig;
use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "padbridge";
const CONFIG_FILE: &str = "config.toml";

/// Reads and writes [`GlobalConfig`] as a single TOML file
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at `<config dir>/padbridge/config.toml`
    pub fn default_location() -> Result<Self> {
        let mut path =
            dirs::config_dir().ok_or_else(|| eyre!("Could not determine config directory"))?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(Self { path })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration. A missing file yields defaults.
    pub async fn load(&self) -> Result<GlobalConfig> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| eyre!("Failed to check if config file exists: {}", e))?
        {
            warn!(
                "Config file {} does not exist, using defaults",
                self.path.display()
            );
            return Ok(GlobalConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| eyre!("Failed to read config file {}: {}", self.path.display(), e))?;

        let config: GlobalConfig = toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse config file {}: {}", self.path.display(), e))?;

        debug!(
            "Loaded config with {} overlay controls",
            config.overlay.controls.len()
        );
        Ok(config)
    }

    pub async fn save(&self, config: &GlobalConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !tokio::fs::try_exists(parent)
                .await
                .map_err(|e| eyre!("Failed to check if config directory exists: {}", e))?
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
            }
        }

        let content = toml::to_string_pretty(config)
            .map_err(|e| eyre!("Failed to serialize config: {}", e))?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| eyre!("Failed to write config file: {}", e))?;

        info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
