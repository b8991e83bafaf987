use std::fs;

use crate::config::AppPaths;
use crate::error::AppResult;

use super::AuthToken;

pub trait TokenStore {
    fn load(&self, profile: &str) -> AppResult<Option<AuthToken>>;
    fn save(&self, profile: &str, token: &AuthToken) -> AppResult<()>;
    fn clear(&self, profile: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    paths: AppPaths,
}

impl FileTokenStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, profile: &str) -> AppResult<Option<AuthToken>> {
        let path = self.paths.token_file(profile);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        let token: AuthToken = serde_json::from_str(&raw)?;
        if token.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(token))
    }

    fn save(&self, profile: &str, token: &AuthToken) -> AppResult<()> {
        crate::config::write_private(&self.paths.token_file(profile), token)
    }

    fn clear(&self, profile: &str) -> AppResult<()> {
        let path = self.paths.token_file(profile);
        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn store() -> (FileTokenStore, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!(
            "onebox-token-store-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let paths = AppPaths::at(root.join("config"), root.join("data"));
        (FileTokenStore::new(paths), root)
    }

    #[test]
    fn save_load_clear() {
        let (store, root) = store();
        assert!(store.load("work").expect("load").is_none());

        let mut token = AuthToken::new("secret", SystemTime::now());
        token.email = Some("me@example.com".to_string());
        store.save("work", &token).expect("save");

        let loaded = store.load("work").expect("load").expect("token present");
        assert_eq!(loaded.token, "secret");
        assert_eq!(loaded.email.as_deref(), Some("me@example.com"));

        store.clear("work").expect("clear");
        assert!(store.load("work").expect("load").is_none());
        let _ = std::fs::remove_dir_all(root);
    }
}
