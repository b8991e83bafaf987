use std::collections::BTreeSet;

use crate::api::OneBoxClient;
use crate::api::models::{Category, Filters};
use crate::auth::{FileTokenStore, SessionService};
use crate::cli::ViewArgs;
use crate::config::{self, AppPaths, Settings};
use crate::error::AppResult;
use crate::output::Output;
use crate::store::Store;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub paths: AppPaths,
    pub settings: Settings,
    pub token_store: FileTokenStore,
    pub client: OneBoxClient,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile);
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?;
        let token_store = FileTokenStore::new(paths.clone());
        let client = OneBoxClient::new(&settings.api_url())?;
        let output = Output::new(json);
        log::debug!("profile {profile} using {}", client.base_url());

        Ok(Self {
            profile,
            paths,
            settings,
            token_store,
            client,
            output,
        })
    }

    pub async fn authorized_client(&self) -> AppResult<OneBoxClient> {
        SessionService::authorize(&self.profile, &self.client, &self.token_store).await
    }

    /// Builds a store, loads the accounts and fetches the page `view` asks
    /// for.
    pub async fn open_store(&self, view: &ViewArgs) -> AppResult<Store<OneBoxClient>> {
        let client = self.authorized_client().await?;
        let mut store = Store::new(client);

        let preferred = view
            .account
            .as_deref()
            .or_else(|| self.settings.default_account());
        store.prefer_account(preferred);

        store.change_folder(view.folder).await?;
        store.search(view.search.as_deref()).await?;
        store.set_filters(filters_from(&view.filters)).await?;
        store.fetch_credentials().await?;

        if let Some(account) = view.account.as_deref() {
            store.select_account(account).await?;
        }
        if view.page > 1 {
            store.go_to_page(view.page).await?;
        }

        Ok(store)
    }
}

pub fn filters_from(pairs: &[(Category, String)]) -> Filters {
    let mut filters = Filters::new();
    for (category, value) in pairs {
        filters
            .entry(*category)
            .or_insert_with(BTreeSet::new)
            .insert(value.clone());
    }
    filters
}
