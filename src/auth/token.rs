use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Session token issued by the OneBox backend after the browser login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    #[serde(default)]
    pub saved_at_unix: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl AuthToken {
    pub fn new(token: impl Into<String>, now: SystemTime) -> Self {
        Self {
            token: token.into(),
            saved_at_unix: now
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|duration| duration.as_secs()),
            email: None,
            name: None,
        }
    }

    pub fn age_seconds(&self, now: SystemTime) -> Option<u64> {
        let saved_at = self.saved_at_unix?;
        let now_secs = now.duration_since(UNIX_EPOCH).ok()?.as_secs();
        Some(now_secs.saturating_sub(saved_at))
    }
}
