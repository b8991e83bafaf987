use crate::api::models::BulkAction;

use super::mutation::Change;

/// A change cleared to run, either because it needs no confirmation or
/// because the user accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approved(Change);

impl Approved {
    pub fn change(&self) -> &Change {
        &self.0
    }

    pub(super) fn into_change(self) -> Change {
        self.0
    }
}

/// A destructive or bulk change waiting on the user.
#[must_use = "a confirmation must be accepted or cancelled"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    change: Change,
}

impl Confirmation {
    pub fn change(&self) -> &Change {
        &self.change
    }

    pub fn prompt(&self) -> String {
        match &self.change {
            Change::Status { .. } => "Move this email to trash?".to_string(),
            Change::Bulk { ids, action } => {
                let noun = if ids.len() == 1 { "email" } else { "emails" };
                match action {
                    BulkAction::Trash => format!("Move {} {noun} to trash?", ids.len()),
                    BulkAction::Archive => format!("Archive {} {noun}?", ids.len()),
                    BulkAction::Inbox => format!("Move {} {noun} to inbox?", ids.len()),
                }
            }
        }
    }

    pub fn accept(self) -> Approved {
        Approved(self.change)
    }

    /// Drops the change. Nothing was applied, so nothing needs undoing.
    pub fn cancel(self) {
        log::debug!("cancelled {:?}", self.change);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staged {
    Ready(Approved),
    NeedsConfirmation(Confirmation),
}

pub fn stage(change: Change) -> Staged {
    if change.needs_confirmation() {
        Staged::NeedsConfirmation(Confirmation { change })
    } else {
        Staged::Ready(Approved(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::StatusAction;

    #[test]
    fn star_is_ready_immediately() {
        let staged = stage(Change::status("a", StatusAction::Starred));
        assert!(matches!(staged, Staged::Ready(_)));
    }

    #[test]
    fn trash_waits_for_confirmation() {
        let staged = stage(Change::status("a", StatusAction::Trash));
        let Staged::NeedsConfirmation(confirmation) = staged else {
            panic!("trash must be gated");
        };
        assert_eq!(confirmation.prompt(), "Move this email to trash?");
    }

    #[test]
    fn bulk_prompt_counts_messages() {
        let staged = stage(Change::bulk(["a", "b", "c"], BulkAction::Trash));
        let Staged::NeedsConfirmation(confirmation) = staged else {
            panic!("bulk must be gated");
        };
        assert_eq!(confirmation.prompt(), "Move 3 emails to trash?");
    }

    #[test]
    fn accepted_confirmation_carries_the_change() {
        let Staged::NeedsConfirmation(confirmation) =
            stage(Change::bulk(["a"], BulkAction::Archive))
        else {
            panic!("bulk must be gated");
        };
        assert_eq!(confirmation.prompt(), "Archive 1 email?");

        let approved = confirmation.accept();
        assert_eq!(approved.change().ids(), ["a"]);
    }
}
