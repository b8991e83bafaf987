use crate::api::models::{Address, Email};
use crate::cli::ShowArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

use super::format_size;

const BODY_WIDTH: usize = 100;

pub async fn run(ctx: &AppContext, args: ShowArgs) -> AppResult<()> {
    let mut store = ctx.open_store(&args.view).await?;
    store.open_email(&args.id, false).await?;
    if args.collapsed {
        store.view_mut().toggle_expanded();
    }

    let email = store.selected_email().ok_or_else(|| {
        AppError::InvalidInput(format!("{} is no longer on this page", args.id))
    })?;

    let lines = render_detail(email, store.view().is_expanded());
    ctx.output.emit_block(&lines, email)
}

fn render_detail(email: &Email, expanded: bool) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{}{}",
            if email.subject.trim().is_empty() {
                "(no subject)"
            } else {
                email.subject.trim()
            },
            if email.starred { " ★" } else { "" }
        ),
        format!("from: {}", format_address(&email.from)),
    ];

    if !email.to.is_empty() {
        lines.push(format!("to: {}", format_addresses(&email.to)));
    }
    if !email.cc.is_empty() {
        lines.push(format!("cc: {}", format_addresses(&email.cc)));
    }
    if let Some(received_at) = email.received_at {
        lines.push(format!("date: {}", received_at.format("%a, %d %b %Y %H:%M UTC")));
    }
    lines.push(format!("folder: {}", email.folder));

    let badges = email.tags.badges();
    if !badges.is_empty() {
        lines.push(format!("tags: {}", badges.join(", ")));
    }

    if !email.attachments.is_empty() {
        lines.push(String::new());
        lines.push(format!("{} attachments:", email.attachments.len()));
        for attachment in &email.attachments {
            lines.push(format!(
                "  {} ({})",
                attachment.filename,
                format_size(attachment.size)
            ));
        }
    }

    if expanded {
        lines.push(String::new());
        lines.push(body_text(&email.body));
    }

    lines
}

fn body_text(html: &str) -> String {
    if html.trim().is_empty() {
        return "(empty message)".to_string();
    }

    html2text::from_read(html.as_bytes(), BODY_WIDTH)
        .map(|text| text.trim_end().to_string())
        .unwrap_or_else(|err| {
            log::debug!("html render failed, showing raw body: {err}");
            html.to_string()
        })
}

fn format_address(address: &Address) -> String {
    match address.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => format!("{name} <{}>", address.email),
        _ => address.email.clone(),
    }
}

fn format_addresses(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(format_address)
        .collect::<Vec<_>>()
        .join(", ")
}
