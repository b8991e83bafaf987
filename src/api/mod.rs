pub mod client;
pub mod endpoints;
pub mod models;

pub use client::OneBoxClient;

use crate::error::AppResult;

use models::{Account, BulkAction, Counts, EmailPage, EmailQuery, Folder, StatusAction};

/// The backend operations the store depends on.
#[allow(async_fn_in_trait)]
pub trait MailApi {
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;
    async fn add_account(&self, email: &str, app_password: &str) -> AppResult<Account>;
    async fn list_emails(&self, query: &EmailQuery) -> AppResult<EmailPage>;
    async fn counts(&self, account_id: &str, folder: Folder) -> AppResult<Counts>;
    async fn update_status(&self, id: &str, action: StatusAction) -> AppResult<()>;
    async fn bulk_update(&self, ids: &[String], action: BulkAction) -> AppResult<()>;
    /// Asks the backend to pull the last 30 days of mail for an account.
    async fn fetch_recent(&self, account_id: &str) -> AppResult<()>;
}
