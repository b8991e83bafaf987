use serde::Serialize;

use crate::cli::{SyncArgs, ViewArgs};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::store::FetchOutcome;

#[derive(Debug, Serialize)]
struct SyncResult<'a> {
    account: Option<&'a str>,
    refreshed: bool,
    emails: usize,
}

pub async fn run(ctx: &AppContext, args: SyncArgs) -> AppResult<()> {
    let view = ViewArgs {
        account: args.account,
        ..ViewArgs::default()
    };
    let mut store = ctx.open_store(&view).await?;
    let outcome = store.sync_recent().await?;

    let account = store
        .accounts()
        .selected()
        .map(|account| account.email.as_str());
    let emails = store.emails().emails().len();
    let text = match outcome {
        FetchOutcome::Applied => format!(
            "synced {}; {emails} emails on the first page",
            account.unwrap_or("account")
        ),
        FetchOutcome::Stale | FetchOutcome::Skipped => {
            format!("synced {}", account.unwrap_or("account"))
        }
    };

    ctx.output.emit(
        &text,
        &SyncResult {
            account,
            refreshed: outcome == FetchOutcome::Applied,
            emails,
        },
    )
}
