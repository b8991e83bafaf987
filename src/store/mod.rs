//! Shared client state: accounts, the visible page of email, counts and
//! view state, plus the intents that change them.
//!
//! Everything goes through one explicit [`Store`] value. Intents that change
//! the account, folder, page, search or filters trigger exactly one fetch.
//! Status changes are applied locally first and rolled back if the backend
//! rejects them.

pub mod accounts;
pub mod confirm;
pub mod emails;
pub mod mutation;
pub mod view;

pub use accounts::AccountStore;
pub use confirm::{Approved, Confirmation, Staged, stage};
pub use emails::{EmailStore, FetchOutcome, FetchTicket, PAGE_SIZE};
pub use mutation::{Change, PendingMutation};
pub use view::{Layout, ViewState};

use crate::api::MailApi;
use crate::api::models::{Account, Category, Email, Filters, Folder, StatusAction};
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct Store<A> {
    api: A,
    accounts: AccountStore,
    emails: EmailStore,
    view: ViewState,
}

impl<A: MailApi> Store<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            accounts: AccountStore::default(),
            emails: EmailStore::default(),
            view: ViewState::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn emails(&self) -> &EmailStore {
        &self.emails
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn selected_email(&self) -> Option<&Email> {
        self.emails.get(self.view.selected_id()?)
    }

    pub fn prefer_account(&mut self, needle: Option<&str>) {
        self.accounts.prefer(needle);
    }

    pub async fn fetch_credentials(&mut self) -> AppResult<()> {
        let accounts = match self.api.list_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                log::warn!("error fetching email credentials: {err}");
                return Err(err);
            }
        };

        log::debug!("fetched {} accounts", accounts.len());
        if self.accounts.replace(accounts) {
            self.reload_for_account().await;
        }
        Ok(())
    }

    /// Connects a mailbox. On failure nothing is added.
    pub async fn add_account(&mut self, email: &str, app_password: &str) -> AppResult<Account> {
        let account = match self.api.add_account(email, app_password).await {
            Ok(account) => account,
            Err(err) => {
                log::warn!("error adding email account {email}: {err}");
                return Err(err);
            }
        };

        log::info!("connected {} ({})", account.email, account.provider);
        if self.accounts.add(account.clone()) {
            self.reload_for_account().await;
        }
        if let Err(err) = self.fetch_credentials().await {
            log::debug!("account list not refreshed after add: {err}");
        }

        Ok(account)
    }

    pub async fn select_account(&mut self, needle: &str) -> AppResult<FetchOutcome> {
        if !self.accounts.select(needle)? {
            return Ok(FetchOutcome::Skipped);
        }
        self.on_account_changed().await
    }

    /// The account change stands even when its first page cannot be loaded.
    async fn reload_for_account(&mut self) {
        if let Err(err) = self.on_account_changed().await {
            log::debug!("page not loaded after account change: {err}");
        }
    }

    async fn on_account_changed(&mut self) -> AppResult<FetchOutcome> {
        self.emails.reset_for_account();
        self.view.clear_selection();
        self.refresh().await
    }

    pub async fn change_folder(&mut self, folder: Folder) -> AppResult<FetchOutcome> {
        if !self.emails.set_folder(folder) {
            return Ok(FetchOutcome::Skipped);
        }
        self.view.clear_selection();
        self.refresh().await
    }

    pub async fn search(&mut self, query: Option<&str>) -> AppResult<FetchOutcome> {
        if !self.emails.set_search(query) {
            return Ok(FetchOutcome::Skipped);
        }
        self.view.clear_selection();
        self.refresh().await
    }

    pub async fn toggle_filter(&mut self, category: Category, value: &str) -> AppResult<FetchOutcome> {
        if !self.emails.toggle_filter(category, value) {
            return Ok(FetchOutcome::Skipped);
        }
        self.view.clear_selection();
        self.refresh().await
    }

    pub async fn set_filters(&mut self, filters: Filters) -> AppResult<FetchOutcome> {
        if !self.emails.set_filters(filters) {
            return Ok(FetchOutcome::Skipped);
        }
        self.view.clear_selection();
        self.refresh().await
    }

    pub async fn first_page(&mut self) -> AppResult<FetchOutcome> {
        let moved = self.emails.first_page();
        self.refresh_if(moved).await
    }

    pub async fn prev_page(&mut self) -> AppResult<FetchOutcome> {
        let moved = self.emails.prev_page();
        self.refresh_if(moved).await
    }

    pub async fn next_page(&mut self) -> AppResult<FetchOutcome> {
        let moved = self.emails.next_page();
        self.refresh_if(moved).await
    }

    pub async fn last_page(&mut self) -> AppResult<FetchOutcome> {
        let moved = self.emails.last_page();
        self.refresh_if(moved).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> AppResult<FetchOutcome> {
        let moved = self.emails.go_to_page(page);
        self.refresh_if(moved).await
    }

    async fn refresh_if(&mut self, changed: bool) -> AppResult<FetchOutcome> {
        if !changed {
            return Ok(FetchOutcome::Skipped);
        }
        self.refresh().await
    }

    /// Re-fetches the current page and, when it lands, the counts.
    pub async fn refresh(&mut self) -> AppResult<FetchOutcome> {
        let Some(ticket) = self.begin_fetch() else {
            return Ok(FetchOutcome::Skipped);
        };
        let result = self.api.list_emails(ticket.query()).await;
        let outcome = self.finish_fetch(ticket, result)?;

        if outcome == FetchOutcome::Applied {
            if let Err(err) = self.refresh_counts().await {
                log::debug!("counts unavailable after fetch: {err}");
            }
        }
        Ok(outcome)
    }

    /// Starts a list fetch for the current parameters. `None` when no account
    /// is selected.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let account_id = self.accounts.selected_id()?.to_string();
        Some(self.emails.begin_fetch(&account_id))
    }

    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: AppResult<crate::api::models::EmailPage>,
    ) -> AppResult<FetchOutcome> {
        let outcome = self.emails.finish_fetch(ticket, result)?;
        if outcome == FetchOutcome::Applied {
            self.drop_missing_selection();
        }
        Ok(outcome)
    }

    pub async fn refresh_counts(&mut self) -> AppResult<FetchOutcome> {
        let Some(account_id) = self.accounts.selected_id().map(ToOwned::to_owned) else {
            return Ok(FetchOutcome::Skipped);
        };

        let ticket = self.emails.begin_counts(&account_id);
        let result = self.api.counts(ticket.account_id(), ticket.folder()).await;
        self.emails.finish_counts(ticket, result)
    }

    /// Asks the backend to pull recent mail for the selected account, then
    /// reloads the page.
    pub async fn sync_recent(&mut self) -> AppResult<FetchOutcome> {
        let account_id = self.require_account()?.id.clone();
        if let Err(err) = self.api.fetch_recent(&account_id).await {
            log::warn!("error syncing recent mail for {account_id}: {err}");
            return Err(err);
        }
        self.refresh().await
    }

    /// Selects a message for reading and marks it read. The read flag is set
    /// locally right away; a failed request only reverts the flag.
    pub async fn open_email(&mut self, id: &str, narrow: bool) -> AppResult<()> {
        let Some(email) = self.emails.get(id) else {
            return Err(AppError::InvalidInput(format!(
                "not on the current page: {id}"
            )));
        };
        let unread = !email.read;

        self.view.select(id, narrow);
        if unread {
            if let Err(err) = self.apply(Change::status(id, StatusAction::Read)).await {
                log::warn!("error marking {id} as read: {err}");
            }
        }
        Ok(())
    }

    pub async fn toggle_star(&mut self, id: &str) -> AppResult<()> {
        let Some(email) = self.emails.get(id) else {
            return Err(AppError::InvalidInput(format!(
                "not on the current page: {id}"
            )));
        };
        let change = Change::toggle_star(email);
        self.apply(change).await
    }

    async fn apply(&mut self, change: Change) -> AppResult<()> {
        match stage(change) {
            Staged::Ready(approved) => self.commit(approved).await,
            Staged::NeedsConfirmation(confirmation) => {
                let prompt = confirmation.prompt();
                confirmation.cancel();
                Err(AppError::InvalidInput(format!("{prompt} requires confirmation")))
            }
        }
    }

    /// Optimistically applies an approved change, sends it, and rolls it back
    /// if the backend rejects it.
    pub async fn commit(&mut self, approved: Approved) -> AppResult<()> {
        let pending = self.begin(approved)?;
        let result = match pending.change() {
            Change::Status { id, action } => self.api.update_status(id, *action).await,
            Change::Bulk { ids, action } => self.api.bulk_update(ids, *action).await,
        };
        self.settle(pending, result).await
    }

    /// Local half of [`Store::commit`]: mutates the page and counts and
    /// returns the handle needed to settle it.
    pub fn begin(&mut self, approved: Approved) -> AppResult<PendingMutation> {
        let change = approved.into_change();
        let pending = self.emails.apply(&change)?;
        log::debug!("applied {change:?} locally");
        self.drop_missing_selection();
        Ok(pending)
    }

    pub async fn settle(
        &mut self,
        pending: PendingMutation,
        result: AppResult<()>,
    ) -> AppResult<()> {
        match result {
            Ok(()) => {
                if let Err(err) = self.refresh_counts().await {
                    log::debug!("counts unavailable after update: {err}");
                }
                Ok(())
            }
            Err(err) => {
                log::warn!("error updating {:?}: {err}", pending.change());
                if self.emails.revert(pending) {
                    log::warn!("reverted local change");
                }
                Err(err)
            }
        }
    }

    fn require_account(&self) -> AppResult<&Account> {
        self.accounts.selected().ok_or_else(|| {
            AppError::InvalidInput(
                "no account connected. run `onebox accounts add`".to_string(),
            )
        })
    }

    fn drop_missing_selection(&mut self) {
        let missing = self
            .view
            .selected_id()
            .is_some_and(|id| self.emails.get(id).is_none());
        if missing {
            self.view.clear_selection();
        }
    }
}
