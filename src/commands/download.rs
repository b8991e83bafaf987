use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::api::models::{Attachment, Email};
use crate::cli::DownloadArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

use super::format_size;

#[derive(Debug, Serialize)]
struct Saved {
    filename: String,
    path: PathBuf,
    bytes: u64,
}

pub async fn run(ctx: &AppContext, args: DownloadArgs) -> AppResult<()> {
    let store = ctx.open_store(&args.view).await?;
    let email = store.emails().get(&args.id).ok_or_else(|| {
        AppError::InvalidInput(format!("not on the current page: {}", args.id))
    })?;

    let wanted = pick_attachments(email, args.attachment.as_deref())?;
    let out_dir = args.out.unwrap_or_else(|| ctx.paths.downloads_dir());
    fs::create_dir_all(&out_dir)?;

    let mut saved = Vec::with_capacity(wanted.len());
    for attachment in wanted {
        let Some(url) = attachment.url.as_deref() else {
            log::warn!("{} has no download url; skipping", attachment.filename);
            continue;
        };

        let bytes = store.api().download(url).await?;
        let path = out_dir.join(safe_filename(&attachment.filename));
        fs::write(&path, &bytes)?;
        log::info!("saved {} ({} bytes)", path.display(), bytes.len());

        saved.push(Saved {
            filename: attachment.filename.clone(),
            path,
            bytes: bytes.len() as u64,
        });
    }

    let lines = saved
        .iter()
        .map(|file| format!("{} ({})", file.path.display(), format_size(file.bytes)))
        .collect::<Vec<_>>();
    ctx.output.emit_block(&lines, &saved)
}

fn pick_attachments<'a>(email: &'a Email, name: Option<&str>) -> AppResult<Vec<&'a Attachment>> {
    if email.attachments.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{} has no attachments",
            email.id
        )));
    }

    let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
        return Ok(email.attachments.iter().collect());
    };

    let matched = email
        .attachments
        .iter()
        .filter(|attachment| attachment.filename.eq_ignore_ascii_case(name))
        .collect::<Vec<_>>();
    if matched.is_empty() {
        let known = email
            .attachments
            .iter()
            .map(|attachment| attachment.filename.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::InvalidInput(format!(
            "no attachment named `{name}` (have: {known})"
        )));
    }
    Ok(matched)
}

/// Keeps only the last path component so a hostile filename cannot escape
/// the output directory.
fn safe_filename(raw: &str) -> String {
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "..")
        .unwrap_or("attachment")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_with(files: &[&str]) -> Email {
        let raw = serde_json::json!({
            "_id": "e1",
            "attachments": files
                .iter()
                .map(|name| serde_json::json!({"filename": name, "size": 10, "url": "/files/x"}))
                .collect::<Vec<_>>(),
        });
        serde_json::from_value(raw).expect("email")
    }

    #[test]
    fn picks_all_attachments_without_a_name() {
        let email = email_with(&["a.pdf", "b.png"]);
        assert_eq!(pick_attachments(&email, None).expect("pick").len(), 2);
    }

    #[test]
    fn picks_attachment_by_name_ignoring_case() {
        let email = email_with(&["Report.PDF", "b.png"]);
        let picked = pick_attachments(&email, Some("report.pdf")).expect("pick");
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].filename, "Report.PDF");
    }

    #[test]
    fn unknown_attachment_lists_known_names() {
        let email = email_with(&["a.pdf"]);
        let err = pick_attachments(&email, Some("z.doc")).expect_err("missing");
        assert!(err.to_string().contains("a.pdf"));
    }

    #[test]
    fn filenames_cannot_escape_output_dir() {
        assert_eq!(safe_filename("../../etc/passwd"), "passwd");
        assert_eq!(safe_filename("notes.txt"), "notes.txt");
        assert_eq!(safe_filename(".."), "attachment");
        assert_eq!(safe_filename(""), "attachment");
    }
}
