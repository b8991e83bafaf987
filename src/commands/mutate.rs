use serde::Serialize;

use crate::api::models::{BulkAction, Counts, Folder, StatusAction};
use crate::cli::{MoveArgs, StarArgs};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::store::{Change, Staged, stage};

use super::confirm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Archive,
    Unarchive,
    Trash,
}

#[derive(Debug, Serialize)]
struct MutationResult<'a> {
    action: &'a str,
    ids: Vec<&'a str>,
    applied: bool,
    counts: Option<&'a Counts>,
}

pub async fn star(ctx: &AppContext, args: StarArgs) -> AppResult<()> {
    let mut store = ctx.open_store(&args.view).await?;
    store.toggle_star(&args.id).await?;

    let starred = store
        .emails()
        .get(&args.id)
        .is_some_and(|email| email.starred);
    let action = if starred {
        StatusAction::Starred
    } else {
        StatusAction::Unstarred
    };

    let text = format!("{} {}", action.as_str(), args.id);
    ctx.output.emit(
        &text,
        &MutationResult {
            action: action.as_str(),
            ids: vec![args.id.as_str()],
            applied: true,
            counts: store.emails().counts(),
        },
    )
}

pub async fn run(ctx: &AppContext, kind: MoveKind, mut args: MoveArgs) -> AppResult<()> {
    if kind == MoveKind::Unarchive && args.view.folder == Folder::Inbox {
        args.view.folder = Folder::Archive;
    }

    let change = build_change(kind, &args.ids)?;
    let mut store = ctx.open_store(&args.view).await?;

    let approved = match stage(change) {
        Staged::Ready(approved) => approved,
        Staged::NeedsConfirmation(confirmation) => {
            if args.yes || confirm(&confirmation.prompt())? {
                confirmation.accept()
            } else {
                let action = action_name(confirmation.change());
                let result = ctx.output.emit(
                    "cancelled",
                    &MutationResult {
                        action,
                        ids: confirmation.change().ids(),
                        applied: false,
                        counts: store.emails().counts(),
                    },
                );
                confirmation.cancel();
                return result;
            }
        }
    };

    let action = action_name(approved.change());
    let ids = approved
        .change()
        .ids()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();
    store.commit(approved).await?;

    let destination = match kind {
        MoveKind::Archive => Folder::Archive,
        MoveKind::Unarchive => Folder::Inbox,
        MoveKind::Trash => Folder::Trash,
    };
    let noun = if ids.len() == 1 { "email" } else { "emails" };
    let text = format!("moved {} {noun} to {destination}", ids.len());
    ctx.output.emit(
        &text,
        &MutationResult {
            action,
            ids: ids.iter().map(String::as_str).collect(),
            applied: true,
            counts: store.emails().counts(),
        },
    )
}

/// One id uses the single-message endpoint, several use the bulk one.
fn build_change(kind: MoveKind, ids: &[String]) -> AppResult<Change> {
    let ids = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect::<Vec<_>>();

    match ids.as_slice() {
        [] => Err(AppError::InvalidInput("at least one email id is required".to_string())),
        [id] => {
            let action = match kind {
                MoveKind::Archive => StatusAction::Archive,
                MoveKind::Unarchive => StatusAction::RemoveArchive,
                MoveKind::Trash => StatusAction::Trash,
            };
            Ok(Change::status(*id, action))
        }
        many => {
            let action = match kind {
                MoveKind::Archive => BulkAction::Archive,
                MoveKind::Unarchive => BulkAction::Inbox,
                MoveKind::Trash => BulkAction::Trash,
            };
            Ok(Change::bulk(many.iter().copied(), action))
        }
    }
}

fn action_name(change: &Change) -> &'static str {
    match change {
        Change::Status { action, .. } => action.as_str(),
        Change::Bulk { action, .. } => action.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn single_id_uses_status_action() {
        let change = build_change(MoveKind::Unarchive, &ids(&["a"])).expect("change");
        assert_eq!(change, Change::status("a", StatusAction::RemoveArchive));
        assert!(!change.needs_confirmation());
    }

    #[test]
    fn several_ids_use_bulk_action() {
        let change = build_change(MoveKind::Unarchive, &ids(&["a", "b"])).expect("change");
        assert_eq!(change, Change::bulk(["a", "b"], BulkAction::Inbox));
        assert!(change.needs_confirmation());
    }

    #[test]
    fn single_trash_still_needs_confirmation() {
        let change = build_change(MoveKind::Trash, &ids(&["a"])).expect("change");
        assert!(change.needs_confirmation());
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(build_change(MoveKind::Archive, &ids(&[" ", ""])).is_err());
    }
}
