use crate::api::models::Account;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: Vec<Account>,
    selected: Option<String>,
    preferred: Option<String>,
}

impl AccountStore {
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn selected(&self) -> Option<&Account> {
        let id = self.selected.as_deref()?;
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected().map(|account| account.id.as_str())
    }

    /// Account (id or email) to select instead of the first one when a fetch
    /// lands with nothing selected.
    pub fn prefer(&mut self, needle: Option<&str>) {
        self.preferred = needle
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(ToOwned::to_owned);
    }

    /// Replaces the account list with a fresh fetch. Keeps the current
    /// selection when it still exists, otherwise falls back to the preferred
    /// account or the first one. Returns true when the selection changed.
    pub fn replace(&mut self, accounts: Vec<Account>) -> bool {
        let before = self.selected.clone();
        self.accounts = accounts;

        if self.selected().is_none() {
            let preferred = self
                .preferred
                .as_deref()
                .and_then(|needle| self.find(needle))
                .or_else(|| self.accounts.first());
            self.selected = preferred.map(|account| account.id.clone());
        }

        before != self.selected
    }

    fn find(&self, needle: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.id == needle || account.email.eq_ignore_ascii_case(needle))
    }

    /// Adds a freshly connected account and makes it the selection.
    pub fn add(&mut self, account: Account) -> bool {
        let before = self.selected.clone();
        let id = account.id.clone();

        match self.accounts.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
        self.selected = Some(id);

        before != self.selected
    }

    /// Selects by id or (case-insensitive) email address.
    pub fn select(&mut self, needle: &str) -> AppResult<bool> {
        let needle = needle.trim();
        let Some(account) = self.find(needle) else {
            return Err(AppError::InvalidInput(format!(
                "unknown account `{needle}`; run `onebox accounts ls` to inspect accounts"
            )));
        };

        let changed = self.selected.as_deref() != Some(account.id.as_str());
        self.selected = Some(account.id.clone());
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, email: &str) -> Account {
        Account {
            id: id.to_string(),
            email: email.to_string(),
            provider: "gmail".to_string(),
            unread: 0,
        }
    }

    #[test]
    fn first_fetch_selects_first_account() {
        let mut store = AccountStore::default();
        assert!(store.replace(vec![account("a", "a@x.io"), account("b", "b@x.io")]));
        assert_eq!(store.selected_id(), Some("a"));
    }

    #[test]
    fn refetch_keeps_existing_selection() {
        let mut store = AccountStore::default();
        store.replace(vec![account("a", "a@x.io"), account("b", "b@x.io")]);
        store.select("b@x.io").expect("select");

        assert!(!store.replace(vec![account("a", "a@x.io"), account("b", "b@x.io")]));
        assert_eq!(store.selected_id(), Some("b"));
    }

    #[test]
    fn preferred_account_wins_over_first() {
        let mut store = AccountStore::default();
        store.prefer(Some("B@X.IO"));
        store.replace(vec![account("a", "a@x.io"), account("b", "b@x.io")]);
        assert_eq!(store.selected_id(), Some("b"));
    }

    #[test]
    fn unknown_preference_falls_back_to_first() {
        let mut store = AccountStore::default();
        store.prefer(Some("gone@x.io"));
        store.replace(vec![account("a", "a@x.io")]);
        assert_eq!(store.selected_id(), Some("a"));
    }

    #[test]
    fn empty_fetch_leaves_nothing_selected() {
        let mut store = AccountStore::default();
        assert!(!store.replace(Vec::new()));
        assert!(store.selected().is_none());
    }

    #[test]
    fn add_does_not_duplicate_known_account() {
        let mut store = AccountStore::default();
        store.replace(vec![account("a", "a@x.io")]);
        store.add(account("a", "a@x.io"));
        assert_eq!(store.accounts().len(), 1);
    }

    #[test]
    fn select_unknown_account_fails() {
        let mut store = AccountStore::default();
        store.replace(vec![account("a", "a@x.io")]);
        assert!(store.select("nope").is_err());
        assert_eq!(store.selected_id(), Some("a"));
    }
}
