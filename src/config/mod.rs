pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::AppResult;

pub fn resolve_profile(requested: &str) -> String {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }

    trimmed.to_string()
}

pub fn load_settings(paths: &AppPaths, profile: &str) -> AppResult<Settings> {
    settings::load(&paths.settings_file(profile))
}

pub fn save_settings(paths: &AppPaths, profile: &str, settings: &Settings) -> AppResult<()> {
    write_private(&paths.settings_file(profile), settings)
}

/// Writes pretty JSON readable only by the current user.
pub fn write_private<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = serde_json::to_string_pretty(value)?;
    fs::write(path, payload)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}
