use std::fs;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "onebox";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        let data_root = dirs::data_dir()
            .ok_or_else(|| AppError::Config("unable to resolve data directory".to_string()))?;

        let paths = Self::at(config_root.join(APP_DIR), data_root.join(APP_DIR));
        fs::create_dir_all(paths.profiles_dir())?;
        fs::create_dir_all(paths.tokens_dir())?;
        Ok(paths)
    }

    /// Paths rooted at explicit directories. Nothing is created.
    pub fn at(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data_dir,
        }
    }

    pub fn settings_file(&self, profile: &str) -> PathBuf {
        self.profiles_dir().join(format!("{profile}.json"))
    }

    pub fn token_file(&self, profile: &str) -> PathBuf {
        self.tokens_dir().join(format!("{profile}.json"))
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.data_dir.join("downloads")
    }

    fn profiles_dir(&self) -> PathBuf {
        self.config_dir.join("profiles")
    }

    fn tokens_dir(&self) -> PathBuf {
        self.data_dir.join("tokens")
    }
}
