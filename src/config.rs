use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_PREFIX: &str = "sheet-gallery";
const DEFAULT_CALLBACK_PORT: u16 = 8085;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_key: String,
    pub public_sheet_id: String,
    pub callback_port: u16,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_key: String::new(),
            public_sheet_id: String::new(),
            callback_port: DEFAULT_CALLBACK_PORT,
        }
    }
}

impl GoogleConfig {
    /// Fail unless the OAuth client is configured.
    pub fn require_client(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(AppError::Config(
                "Google client_id must be set in config file or GOOGLE_CLIENT_ID".to_string(),
            ));
        }
        Ok(())
    }

    /// Fail unless the public sheet and its API key are configured.
    pub fn require_public_sheet(&self) -> Result<()> {
        if self.api_key.is_empty() || self.public_sheet_id.is_empty() {
            return Err(AppError::Config(
                "Google api_key and public_sheet_id must be set in config file or environment"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Client secret, if one was configured.
    pub fn client_secret(&self) -> Option<&str> {
        Some(self.client_secret.as_str()).filter(|s| !s.is_empty())
    }
}

/// Values taken from the command line or environment, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_key: Option<String>,
    pub public_sheet_id: Option<String>,
    pub callback_port: Option<u16>,
}

impl Config {
    /// Load the config file if present and apply overrides on top.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let config_path = Self::config_file()?;

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            Self::parse(&contents)?
        } else {
            Config::default()
        };

        config.apply(overrides);
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        let google = &mut self.google;
        if let Some(client_id) = overrides.client_id {
            google.client_id = client_id;
        }
        if let Some(client_secret) = overrides.client_secret {
            google.client_secret = client_secret;
        }
        if let Some(api_key) = overrides.api_key {
            google.api_key = api_key;
        }
        if let Some(sheet_id) = overrides.public_sheet_id {
            google.public_sheet_id = sheet_id;
        }
        if let Some(port) = overrides.callback_port {
            google.callback_port = port;
        }
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }
}
