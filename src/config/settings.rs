use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const API_URL_ENV: &str = "ONEBOX_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub default_account: Option<String>,
}

impl Settings {
    /// Backend base URL: environment first, then the profile, then the
    /// local development default.
    pub fn api_url(&self) -> String {
        self.api_url_with(std::env::var(API_URL_ENV).ok())
    }

    fn api_url_with(&self, env_override: Option<String>) -> String {
        env_override
            .into_iter()
            .chain(self.api_url.clone())
            .map(|url| url.trim().to_string())
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn default_account(&self) -> Option<&str> {
        self.default_account
            .as_deref()
            .map(str::trim)
            .filter(|account| !account.is_empty())
    }
}

pub fn load(path: &Path) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&raw)?;
    Ok(settings)
}
