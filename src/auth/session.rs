use std::time::SystemTime;

use serde::Serialize;

use crate::api::OneBoxClient;
use crate::error::{AppError, AppResult};

use super::token::AuthToken;
use super::token_store::TokenStore;

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub profile: String,
    pub logged_in: bool,
    pub email: Option<String>,
    pub name: Option<String>,
    pub token_age_seconds: Option<u64>,
    pub note: Option<String>,
}

impl AuthStatus {
    fn logged_out(profile: &str, note: &str) -> Self {
        Self {
            profile: profile.to_string(),
            logged_in: false,
            email: None,
            name: None,
            token_age_seconds: None,
            note: Some(note.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionService;

impl SessionService {
    /// Stores a backend session token after checking it is accepted.
    pub async fn login<S: TokenStore>(
        profile: &str,
        raw_token: &str,
        client: &OneBoxClient,
        store: &S,
    ) -> AppResult<AuthStatus> {
        let raw_token = raw_token.trim();
        if raw_token.is_empty() {
            return Err(AppError::InvalidInput("token must not be empty".to_string()));
        }

        let client = client.clone().with_token(raw_token);
        client.check_auth().await?;

        let mut token = AuthToken::new(raw_token, SystemTime::now());
        match client.profile().await {
            Ok(user) => {
                token.email = user.email;
                token.name = user.name;
            }
            Err(err) => log::debug!("user profile unavailable: {err}"),
        }
        store.save(profile, &token)?;
        log::info!("stored session token for profile {profile}");

        Ok(Self::status_of(profile, &token, "token verified and stored"))
    }

    pub fn status<S: TokenStore>(profile: &str, store: &S) -> AppResult<AuthStatus> {
        let Some(token) = store.load(profile)? else {
            return Ok(AuthStatus::logged_out(profile, "no token found"));
        };

        Ok(Self::status_of(profile, &token, "token loaded from local store"))
    }

    pub fn logout<S: TokenStore>(profile: &str, store: &S) -> AppResult<AuthStatus> {
        store.clear(profile)?;
        Ok(AuthStatus::logged_out(profile, "local credentials removed"))
    }

    /// Loads the stored token and checks it with the backend. A rejected
    /// token is removed, forcing a new login.
    pub async fn authorize<S: TokenStore>(
        profile: &str,
        client: &OneBoxClient,
        store: &S,
    ) -> AppResult<OneBoxClient> {
        let token = store.load(profile)?.ok_or_else(|| {
            AppError::InvalidInput("not logged in. run `onebox auth login`".to_string())
        })?;

        let client = client.clone().with_token(token.token);
        match client.check_auth().await {
            Ok(()) => Ok(client),
            Err(err) if err.is_auth() => {
                log::warn!("session rejected by backend, clearing token for {profile}");
                store.clear(profile)?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn status_of(profile: &str, token: &AuthToken, note: &str) -> AuthStatus {
        AuthStatus {
            profile: profile.to_string(),
            logged_in: true,
            email: token.email.clone(),
            name: token.name.clone(),
            token_age_seconds: token.age_seconds(SystemTime::now()),
            note: Some(note.to_string()),
        }
    }
}
