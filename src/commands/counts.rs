use serde::Serialize;

use crate::api::models::{Counts, Folder};
use crate::cli::{CountsArgs, ViewArgs};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct CountsView<'a> {
    account: &'a str,
    folder: Folder,
    counts: &'a Counts,
}

pub async fn run(ctx: &AppContext, args: CountsArgs) -> AppResult<()> {
    let view = ViewArgs {
        account: args.account,
        folder: args.folder,
        ..ViewArgs::default()
    };
    let store = ctx.open_store(&view).await?;

    let Some(account) = store.accounts().selected() else {
        return Err(AppError::InvalidInput(
            "no account connected. run `onebox accounts add`".to_string(),
        ));
    };
    let Some(counts) = store.emails().counts() else {
        return Err(AppError::Api(format!(
            "counts unavailable for {}",
            account.email
        )));
    };

    let view = CountsView {
        account: &account.email,
        folder: store.emails().folder(),
        counts,
    };
    ctx.output.emit_block(&render_counts(&view), &view)
}

fn render_counts(view: &CountsView<'_>) -> Vec<String> {
    let mut lines = vec![format!("{} · {}", view.account, view.folder)];
    for folder in Folder::ALL {
        lines.push(format!("  {:<8} {}", folder.as_str(), view.counts.folder(folder)));
    }

    for (category, values) in &view.counts.categories {
        lines.push(format!("{category}:"));
        for (value, count) in values {
            lines.push(format!("  {value:<24} {count}"));
        }
    }
    lines
}
