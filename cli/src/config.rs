use anyhow::{Context, Result};
use pretalx_core::Credentials;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::AuthArgs;

/// Persistent configuration saved to disk.
///
/// Passwords are never stored here; `pretalx login` saves the token instead.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the pretalx instance, e.g. https://pretalx.com
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Config {
    /// Get the config file path (~/.config/pretalx/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pretalx").join("config.json"))
    }

    /// Load config from disk, or return default if not found
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "ignoring malformed config: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save config to the default location, returning where it was written
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().context("could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;

        // The file may hold an API token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("restricting permissions of {}", path.display()))?;
        }
        Ok(())
    }
}

/// Effective connection settings after merging flags, environment and config
#[derive(Debug)]
pub struct Settings {
    pub url: String,
    pub credentials: Credentials,
}

impl Settings {
    /// Priority: 1. flag or environment variable, 2. config file
    pub fn resolve(args: &AuthArgs, config: &Config) -> Result<Self> {
        let url = args
            .url
            .clone()
            .or_else(|| config.url.clone())
            .filter(|u| !u.is_empty())
            .context("no pretalx URL given (use --url, PRETALX_URL or the config file)")?;

        let credentials = Credentials::resolve(
            args.username.clone().or_else(|| config.username.clone()),
            args.password.clone(),
            args.token.clone().or_else(|| config.token.clone()),
        )?;

        Ok(Self { url, credentials })
    }
}
