use super::models::{EmailQuery, Folder};

pub fn credentials_endpoint() -> &'static str {
    "/emailcred"
}

pub fn email_list_endpoint(account_id: &str) -> String {
    format!("/email/{account_id}")
}

pub fn counts_endpoint(account_id: &str) -> String {
    format!("/email/counts/{account_id}")
}

pub fn status_endpoint(id: &str) -> String {
    format!("/email/status/{id}")
}

pub fn bulk_status_endpoint() -> &'static str {
    "/email/bulk-status"
}

pub fn fetch_recent_endpoint(account_id: &str) -> String {
    format!("/email/fetch/{account_id}")
}

pub fn profile_endpoint() -> &'static str {
    "/user/profile"
}

pub fn auth_check_endpoint() -> &'static str {
    "/auth/check"
}

pub fn list_query(query: &EmailQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("n".to_string(), query.page_size.to_string()),
        ("p".to_string(), query.page.to_string()),
        ("folder".to_string(), query.folder.as_str().to_string()),
    ];

    if let Some(search) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty())
    {
        params.push(("search".to_string(), search.to_string()));
    }

    for (category, values) in &query.filters {
        if values.is_empty() {
            continue;
        }
        let joined = values.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        params.push((category.as_str().to_string(), joined));
    }

    params
}

pub fn counts_query(folder: Folder) -> Vec<(String, String)> {
    vec![("folder".to_string(), folder.as_str().to_string())]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::api::models::{Category, Filters};

    fn query() -> EmailQuery {
        EmailQuery {
            account_id: "acc-1".to_string(),
            page: 3,
            page_size: 20,
            folder: Folder::Archive,
            search: None,
            filters: Filters::new(),
        }
    }

    #[test]
    fn builds_page_and_folder_params() {
        let params = list_query(&query());
        assert_eq!(
            params,
            [
                ("n".to_string(), "20".to_string()),
                ("p".to_string(), "3".to_string()),
                ("folder".to_string(), "archive".to_string()),
            ]
        );
    }

    #[test]
    fn skips_blank_search() {
        let mut query = query();
        query.search = Some("   ".to_string());
        assert!(list_query(&query).iter().all(|(key, _)| key != "search"));

        query.search = Some(" invoice ".to_string());
        assert!(list_query(&query).contains(&("search".to_string(), "invoice".to_string())));
    }

    #[test]
    fn joins_filter_values_per_category() {
        let mut query = query();
        query.filters.insert(
            Category::Priority,
            BTreeSet::from(["Urgent".to_string(), "High".to_string()]),
        );
        query.filters.insert(Category::Purpose, BTreeSet::new());

        let params = list_query(&query);
        assert!(params.contains(&("priority".to_string(), "High,Urgent".to_string())));
        assert!(params.iter().all(|(key, _)| key != "purpose"));
    }
}
