// File: ./src/config.rs
// Handles configuration loading and defaults.
use crate::context::AppContext;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides the `token` config key.
pub const TOKEN_ENV_VAR: &str = "SEMTASK_API_TOKEN";

fn default_api_url() -> String {
    "https://api.todoist.com/sync/v9/sync".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Timezone name handed to the task service with each due record,
    /// e.g. "Australia/Melbourne".
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// API token. The SEMTASK_API_TOKEN environment variable takes precedence.
    #[serde(default)]
    pub token: String,
    /// Directory holding semester.toml and schedule.toml.
    /// Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timezone: default_timezone(),
            token: String::new(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Helper to detect whether an error indicates a missing config file,
    /// checking both our explicit message and underlying IO NotFound errors
    /// anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }
        false
    }

    /// The API token, preferring the environment over the config file.
    /// `None` when neither is set.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| (!self.token.is_empty()).then(|| self.token.clone()))
    }

    /// Where schedule data files live: the configured override, or the
    /// context's data dir.
    pub fn resolve_data_dir(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => ctx.get_data_dir(),
        }
    }
}
