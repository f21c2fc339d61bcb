use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::client::DEFAULT_API_URL;

pub const API_URL_ENV: &str = "RESEARCHER_API_URL";

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Pick the service base URL: explicit flag, then environment, then file, then default
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(API_URL_ENV).ok();
        self.resolve_api_url_with(cli_override, env_value.as_deref())
    }

    fn resolve_api_url_with<'a>(&'a self, cli_override: Option<&'a str>, env_value: Option<&'a str>) -> String {
        // A blank source counts as unset so the next one still applies
        let non_blank = |value: Option<&'a str>| value.map(str::trim).filter(|url| !url.is_empty());

        non_blank(cli_override)
            .or_else(|| non_blank(env_value))
            .or_else(|| non_blank(self.api_url.as_deref()))
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("researcher").join("config.json"))
    }

    /// Where the interactive UI appends its log
    pub fn get_log_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("researcher").join("researcher.log"))
    }
}
