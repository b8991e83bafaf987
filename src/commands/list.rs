use chrono::Utc;
use serde::Serialize;

use crate::api::OneBoxClient;
use crate::api::models::{Counts, Email, Folder};
use crate::cli::ListArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::output::OutputMode;
use crate::store::Store;

use super::{format_preview, format_relative};

#[derive(Debug, Serialize)]
pub(crate) struct PageView<'a> {
    account: Option<&'a str>,
    folder: Folder,
    page: u32,
    total_pages: u32,
    has_prev: bool,
    has_next: bool,
    counts: Option<&'a Counts>,
    emails: &'a [Email],
}

impl<'a> PageView<'a> {
    pub(crate) fn of(store: &'a Store<OneBoxClient>) -> Self {
        let emails = store.emails();
        Self {
            account: store.accounts().selected().map(|account| account.email.as_str()),
            folder: emails.folder(),
            page: emails.page(),
            total_pages: emails.total_pages(),
            has_prev: emails.can_go_back(),
            has_next: emails.can_go_forward(),
            counts: emails.counts(),
            emails: emails.emails(),
        }
    }
}

pub async fn run(ctx: &AppContext, args: ListArgs) -> AppResult<()> {
    let mut store = ctx.open_store(&args.view).await?;

    if args.first {
        store.first_page().await?;
    } else if args.prev {
        store.prev_page().await?;
    } else if args.next {
        store.next_page().await?;
    } else if args.last {
        store.last_page().await?;
    }

    let view = PageView::of(&store);
    if ctx.output.mode() == OutputMode::Json {
        return ctx.output.emit("", &view);
    }

    if store.accounts().selected().is_none() {
        println!("no accounts connected. run `onebox accounts add --email <address>`");
        return Ok(());
    }

    ctx.output.emit_block(&render_page(&view), &view)
}

pub(crate) fn render_page(view: &PageView<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let count = view
        .counts
        .map(|counts| format!(" ({} total)", counts.folder(view.folder)))
        .unwrap_or_default();
    lines.push(format!(
        "{} · {}{count} · page {} of {}",
        view.account.unwrap_or("(no account)"),
        view.folder,
        view.page,
        view.total_pages.max(1)
    ));

    if view.emails.is_empty() {
        lines.push(String::new());
        if view.page > 1 {
            lines.push(format!("End of {}. run with --first to go back.", view.folder));
        } else {
            lines.push("No emails found".to_string());
        }
        return lines;
    }

    let now = Utc::now();
    for (index, email) in view.emails.iter().enumerate() {
        lines.push(String::new());
        lines.push(render_item(index + 1, email, now));
    }

    lines.push(String::new());
    let mut nav = Vec::new();
    if view.has_prev {
        nav.push("--prev");
    }
    if view.has_next {
        nav.push("--next");
    }
    if !nav.is_empty() {
        lines.push(format!("more: {}", nav.join(" ")));
    }

    lines
}

fn render_item(position: usize, email: &Email, now: chrono::DateTime<Utc>) -> String {
    let star = if email.starred { "★" } else { " " };
    let unread = if email.read { " " } else { "•" };
    let subject = if email.subject.trim().is_empty() {
        "(no subject)"
    } else {
        email.subject.trim()
    };

    let mut tags = email.tags.badges();
    if email.has_attachments {
        tags.push("Attachment");
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!("\n   [{}]", tags.join("] ["))
    };

    format!(
        "{position}. {unread}{star} {}  {}  ({})\n   {subject}\n   {}{tags}\n   id: {}",
        email.from.display_name(),
        format_relative(email.received_at, now),
        email.folder,
        format_preview(email.snippet.as_deref(), &email.body),
        email.id,
    )
}
