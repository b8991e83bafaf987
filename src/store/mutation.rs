use crate::api::models::{BulkAction, Email, Folder, StatusAction};
use crate::error::{AppError, AppResult};

use super::emails::EmailStore;

/// A requested status change for one or more messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Status { id: String, action: StatusAction },
    Bulk { ids: Vec<String>, action: BulkAction },
}

impl Change {
    pub fn status(id: impl Into<String>, action: StatusAction) -> Self {
        Change::Status {
            id: id.into(),
            action,
        }
    }

    /// Builds a bulk change. Duplicate ids are dropped, order is kept.
    pub fn bulk<I, S>(ids: I, action: BulkAction) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Change::Bulk { ids: unique, action }
    }

    pub fn toggle_star(email: &Email) -> Self {
        let action = if email.starred {
            StatusAction::Unstarred
        } else {
            StatusAction::Starred
        };
        Change::status(email.id.clone(), action)
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Change::Status { id, .. } => vec![id.as_str()],
            Change::Bulk { ids, .. } => ids.iter().map(String::as_str).collect(),
        }
    }

    pub fn destination(&self) -> Option<Folder> {
        match self {
            Change::Status { action, .. } => action.destination(),
            Change::Bulk { action, .. } => Some(action.destination()),
        }
    }

    /// Trash and every bulk action go through a confirmation step.
    pub fn needs_confirmation(&self) -> bool {
        matches!(
            self,
            Change::Status {
                action: StatusAction::Trash,
                ..
            } | Change::Bulk { .. }
        )
    }
}

/// Undo record for an optimistic mutation that has not been settled yet.
#[must_use = "a pending mutation must be settled or reverted"]
#[derive(Debug)]
pub struct PendingMutation {
    change: Change,
    generation: u64,
    counts_generation: u64,
    undo: Undo,
}

impl PendingMutation {
    pub fn change(&self) -> &Change {
        &self.change
    }
}

#[derive(Debug)]
enum Undo {
    Flags {
        id: String,
        starred: bool,
        read: bool,
    },
    Moved {
        /// Page order when the move was applied. Other pending moves may
        /// remove rows in between, so reinsertion ranks against this.
        order: Vec<String>,
        removed: Vec<Email>,
        count_deltas: Vec<(Folder, i64)>,
    },
}

impl EmailStore {
    /// Applies `change` to the local page before the backend confirms it.
    pub fn apply(&mut self, change: &Change) -> AppResult<PendingMutation> {
        let missing = change
            .ids()
            .into_iter()
            .filter(|id| self.get(id).is_none())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "not on the current page: {}",
                missing.join(", ")
            )));
        }

        let undo = match change.destination() {
            Some(destination) => self.apply_move(&change.ids(), destination)?,
            None => self.apply_flags(change)?,
        };

        Ok(PendingMutation {
            change: change.clone(),
            generation: self.generation,
            counts_generation: self.counts_generation,
            undo,
        })
    }

    fn apply_flags(&mut self, change: &Change) -> AppResult<Undo> {
        let Change::Status { id, action } = change else {
            return Err(AppError::InvalidInput(
                "bulk changes must move messages".to_string(),
            ));
        };
        let Some(email) = self.emails.iter_mut().find(|email| &email.id == id) else {
            return Err(AppError::InvalidInput(format!("not on the current page: {id}")));
        };

        let undo = Undo::Flags {
            id: id.clone(),
            starred: email.starred,
            read: email.read,
        };
        match action {
            StatusAction::Starred => email.starred = true,
            StatusAction::Unstarred => email.starred = false,
            StatusAction::Read => email.read = true,
            StatusAction::Archive | StatusAction::RemoveArchive | StatusAction::Trash => {}
        }

        Ok(undo)
    }

    fn apply_move(&mut self, ids: &[&str], destination: Folder) -> AppResult<Undo> {
        let source = self.folder();
        if source == destination {
            return Err(AppError::InvalidInput(format!(
                "messages are already in {destination}"
            )));
        }

        let order = self
            .emails
            .iter()
            .map(|email| email.id.clone())
            .collect::<Vec<_>>();
        let (removed, kept): (Vec<Email>, Vec<Email>) = std::mem::take(&mut self.emails)
            .into_iter()
            .partition(|email| ids.contains(&email.id.as_str()));
        self.emails = kept;

        let moved = removed.len() as i64;
        let mut count_deltas = Vec::new();
        if let Some(scoped) = self.counts.as_mut() {
            count_deltas.push((source, scoped.counts.adjust(source, -moved)));
            count_deltas.push((destination, scoped.counts.adjust(destination, moved)));
        }

        Ok(Undo::Moved {
            order,
            removed,
            count_deltas,
        })
    }

    /// Rolls back an optimistic mutation whose request failed. State that an
    /// authoritative fetch has replaced since is left alone.
    pub fn revert(&mut self, pending: PendingMutation) -> bool {
        let list_current = pending.generation == self.generation;
        let counts_current = pending.counts_generation == self.counts_generation;

        match pending.undo {
            Undo::Flags { id, starred, read } => {
                if !list_current {
                    return false;
                }
                let Some(email) = self.emails.iter_mut().find(|email| email.id == id) else {
                    return false;
                };
                email.starred = starred;
                email.read = read;
                true
            }
            Undo::Moved {
                order,
                removed,
                count_deltas,
            } => {
                let mut reverted = false;
                if list_current {
                    for email in removed {
                        self.reinsert(&order, email);
                    }
                    reverted = true;
                }
                if counts_current {
                    if let Some(scoped) = self.counts.as_mut() {
                        for (folder, delta) in count_deltas {
                            scoped.counts.adjust(folder, -delta);
                        }
                        reverted = true;
                    }
                }
                reverted
            }
        }
    }

    /// Puts `email` back before the first row that came after it in `order`.
    /// Rows `order` does not know about are skipped.
    fn reinsert(&mut self, order: &[String], email: Email) {
        let rank = |id: &str| order.iter().position(|known| known == id);
        let Some(own) = rank(&email.id) else {
            self.emails.push(email);
            return;
        };

        let index = self
            .emails
            .iter()
            .position(|existing| rank(&existing.id).is_some_and(|other| other > own))
            .unwrap_or(self.emails.len());
        self.emails.insert(index, email);
    }
}
