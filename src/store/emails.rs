use std::collections::BTreeSet;

use crate::api::models::{Category, Counts, Email, EmailPage, EmailQuery, Filters, Folder};
use crate::error::AppResult;

pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    /// Nothing to fetch, usually because no account is selected.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    query: EmailQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &EmailQuery {
        &self.query
    }
}

#[derive(Debug, Clone)]
pub struct CountsTicket {
    seq: u64,
    account_id: String,
    folder: Folder,
}

impl CountsTicket {
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn folder(&self) -> Folder {
        self.folder
    }
}

#[derive(Debug, Clone)]
pub(super) struct ScopedCounts {
    pub(super) account_id: String,
    pub(super) folder: Folder,
    pub(super) counts: Counts,
}

/// The visible page of messages plus everything that scopes it.
#[derive(Debug, Clone)]
pub struct EmailStore {
    pub(super) emails: Vec<Email>,
    folder: Folder,
    page: u32,
    total_pages: u32,
    search: Option<String>,
    filters: Filters,
    pub(super) counts: Option<ScopedCounts>,
    fetch_seq: u64,
    counts_seq: u64,
    loading: bool,
    pub(super) generation: u64,
    pub(super) counts_generation: u64,
}

impl Default for EmailStore {
    fn default() -> Self {
        Self {
            emails: Vec::new(),
            folder: Folder::Inbox,
            page: 1,
            total_pages: 0,
            search: None,
            filters: Filters::new(),
            counts: None,
            fetch_seq: 0,
            counts_seq: 0,
            loading: false,
            generation: 0,
            counts_generation: 0,
        }
    }
}

impl EmailStore {
    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn get(&self, id: &str) -> Option<&Email> {
        self.emails.iter().find(|email| email.id == id)
    }

    pub fn folder(&self) -> Folder {
        self.folder
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn counts(&self) -> Option<&Counts> {
        self.counts.as_ref().map(|scoped| &scoped.counts)
    }

    pub fn query(&self, account_id: &str) -> EmailQuery {
        EmailQuery {
            account_id: account_id.to_string(),
            page: self.page,
            page_size: PAGE_SIZE,
            folder: self.folder,
            search: self.search.clone(),
            filters: self.filters.clone(),
        }
    }

    pub fn set_folder(&mut self, folder: Folder) -> bool {
        if self.folder == folder {
            return false;
        }

        self.folder = folder;
        self.counts = None;
        self.reset_dataset();
        true
    }

    pub fn set_search(&mut self, search: Option<&str>) -> bool {
        let search = search
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(ToOwned::to_owned);
        if self.search == search {
            return false;
        }

        self.search = search;
        self.reset_dataset();
        true
    }

    /// Adds the value to the category's selection, or removes it when it is
    /// already selected.
    pub fn toggle_filter(&mut self, category: Category, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let values = self.filters.entry(category).or_default();
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        if values.is_empty() {
            self.filters.remove(&category);
        }

        self.reset_dataset();
        true
    }

    pub fn set_filters(&mut self, filters: Filters) -> bool {
        let filters = filters
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect::<Filters>();
        if self.filters == filters {
            return false;
        }

        self.filters = filters;
        self.reset_dataset();
        true
    }

    pub fn selected_filters(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.filters.get(&category)
    }

    /// Forgets everything scoped to the previous account.
    pub fn reset_for_account(&mut self) {
        self.counts = None;
        self.reset_dataset();
    }

    fn reset_dataset(&mut self) {
        self.page = 1;
        self.total_pages = 0;
        self.emails.clear();
        self.generation += 1;
    }

    pub fn can_go_back(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.page < self.total_pages && !self.emails.is_empty()
    }

    pub fn first_page(&mut self) -> bool {
        self.can_go_back() && self.go_to_page(1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.can_go_back() && self.go_to_page(self.page - 1)
    }

    pub fn next_page(&mut self) -> bool {
        self.can_go_forward() && self.go_to_page(self.page + 1)
    }

    pub fn last_page(&mut self) -> bool {
        self.can_go_forward() && self.go_to_page(self.total_pages)
    }

    /// Moves to `page` clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page {
            return false;
        }

        self.page = page;
        true
    }

    pub fn begin_fetch(&mut self, account_id: &str) -> FetchTicket {
        self.fetch_seq += 1;
        self.loading = true;
        log::debug!(
            "fetch #{} for {account_id}: {} page {}",
            self.fetch_seq,
            self.folder,
            self.page
        );

        FetchTicket {
            seq: self.fetch_seq,
            query: self.query(account_id),
        }
    }

    /// Applies a list response if it belongs to the latest fetch and still
    /// matches the current parameters. Failures of the latest fetch leave the
    /// previous page in place.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: AppResult<EmailPage>,
    ) -> AppResult<FetchOutcome> {
        let current = self.query(&ticket.query.account_id);
        if ticket.seq != self.fetch_seq || ticket.query != current {
            if ticket.seq == self.fetch_seq {
                self.loading = false;
            }
            log::debug!("discarding stale fetch #{} (latest #{})", ticket.seq, self.fetch_seq);
            return Ok(FetchOutcome::Stale);
        }

        self.loading = false;
        match result {
            Ok(page) => {
                log::debug!(
                    "fetch #{} returned {} emails, {} pages",
                    ticket.seq,
                    page.emails.len(),
                    page.total_pages
                );
                self.emails = page.emails;
                self.total_pages = page.total_pages;
                self.generation += 1;
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                log::warn!("error fetching emails: {err}");
                Err(err)
            }
        }
    }

    pub fn begin_counts(&mut self, account_id: &str) -> CountsTicket {
        self.counts_seq += 1;
        CountsTicket {
            seq: self.counts_seq,
            account_id: account_id.to_string(),
            folder: self.folder,
        }
    }

    pub fn finish_counts(
        &mut self,
        ticket: CountsTicket,
        result: AppResult<Counts>,
    ) -> AppResult<FetchOutcome> {
        if ticket.seq != self.counts_seq || ticket.folder != self.folder {
            log::debug!("discarding stale counts #{}", ticket.seq);
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(counts) => {
                self.counts = Some(ScopedCounts {
                    account_id: ticket.account_id,
                    folder: ticket.folder,
                    counts,
                });
                self.counts_generation += 1;
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                log::warn!("error fetching counts: {err}");
                Err(err)
            }
        }
    }

    /// The (account, folder) pair the current counts were fetched for.
    pub fn counts_scope(&self) -> Option<(&str, Folder)> {
        self.counts
            .as_ref()
            .map(|scoped| (scoped.account_id.as_str(), scoped.folder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn email(id: &str) -> Email {
        serde_json::from_value(serde_json::json!({ "_id": id, "subject": id }))
            .expect("email fixture")
    }

    fn page(ids: &[&str], total_pages: u32) -> EmailPage {
        EmailPage {
            emails: ids.iter().map(|id| email(id)).collect(),
            total_pages,
        }
    }

    fn loaded(ids: &[&str], total_pages: u32) -> EmailStore {
        let mut store = EmailStore::default();
        let ticket = store.begin_fetch("acc");
        store
            .finish_fetch(ticket, Ok(page(ids, total_pages)))
            .expect("fetch applies");
        store
    }

    #[test]
    fn applied_fetch_replaces_page() {
        let store = loaded(&["a", "b"], 4);
        assert_eq!(store.emails().len(), 2);
        assert_eq!(store.total_pages(), 4);
        assert!(!store.is_loading());
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut store = loaded(&["a"], 3);
        store.go_to_page(2);
        let older = store.begin_fetch("acc");
        store.go_to_page(3);
        let newer = store.begin_fetch("acc");

        let outcome = store
            .finish_fetch(newer, Ok(page(&["p3"], 3)))
            .expect("newer applies");
        assert_eq!(outcome, FetchOutcome::Applied);

        let outcome = store
            .finish_fetch(older, Ok(page(&["p2"], 3)))
            .expect("older is dropped");
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(store.emails()[0].id, "p3");
    }

    #[test]
    fn fetch_for_changed_parameters_is_stale() {
        let mut store = loaded(&["a"], 1);
        let ticket = store.begin_fetch("acc");
        store.set_folder(Folder::Trash);

        let outcome = store
            .finish_fetch(ticket, Ok(page(&["x"], 1)))
            .expect("dropped");
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(store.emails().is_empty());
    }

    #[test]
    fn failed_fetch_keeps_previous_page() {
        let mut store = loaded(&["a", "b"], 2);
        let ticket = store.begin_fetch("acc");
        let result = store.finish_fetch(ticket, Err(AppError::Api("boom".to_string())));

        assert!(result.is_err());
        assert_eq!(store.emails().len(), 2);
        assert!(!store.is_loading());
    }

    #[test]
    fn pagination_clamps_and_disables() {
        let mut store = loaded(&["a"], 3);
        assert!(!store.can_go_back());
        assert!(!store.prev_page());
        assert!(!store.first_page());

        assert!(store.last_page());
        assert_eq!(store.page(), 3);
        assert!(!store.can_go_forward());
        assert!(!store.next_page());

        assert!(!store.go_to_page(9));
        assert_eq!(store.page(), 3);
        assert!(store.go_to_page(0));
        assert_eq!(store.page(), 1);
    }

    #[test]
    fn next_is_disabled_for_empty_page() {
        let mut store = loaded(&[], 5);
        assert!(!store.can_go_forward());
        assert!(!store.next_page());
        assert!(!store.last_page());
    }

    #[test]
    fn scope_changes_reset_to_first_page() {
        let mut store = loaded(&["a"], 5);
        store.go_to_page(4);
        assert!(store.set_search(Some("invoice")));
        assert_eq!(store.page(), 1);

        store.go_to_page(1);
        assert!(!store.set_search(Some("  invoice ")));

        let mut store = loaded(&["a"], 5);
        store.go_to_page(4);
        assert!(store.toggle_filter(Category::Priority, "Urgent"));
        assert_eq!(store.page(), 1);

        let mut store = loaded(&["a"], 5);
        store.go_to_page(4);
        assert!(store.set_folder(Folder::Archive));
        assert_eq!(store.page(), 1);
        assert!(!store.set_folder(Folder::Archive));
    }

    #[test]
    fn toggling_filter_twice_clears_category() {
        let mut store = EmailStore::default();
        store.toggle_filter(Category::Purpose, "Work");
        store.toggle_filter(Category::Purpose, "Personal");
        assert_eq!(
            store.selected_filters(Category::Purpose).map(BTreeSet::len),
            Some(2)
        );

        store.toggle_filter(Category::Purpose, "Work");
        store.toggle_filter(Category::Purpose, "Personal");
        assert!(store.filters().is_empty());
    }

    #[test]
    fn counts_for_previous_folder_are_dropped() {
        let mut store = EmailStore::default();
        let ticket = store.begin_counts("acc");
        store.set_folder(Folder::Archive);

        let outcome = store
            .finish_counts(ticket, Ok(Counts::default()))
            .expect("dropped");
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(store.counts().is_none());
    }
}
