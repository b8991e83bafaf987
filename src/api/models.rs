use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub unread: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    #[default]
    Inbox,
    Archive,
    Trash,
}

impl Folder {
    pub const ALL: [Folder; 3] = [Folder::Inbox, Folder::Archive, Folder::Trash];

    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Inbox => "inbox",
            Folder::Archive => "archive",
            Folder::Trash => "trash",
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Folder {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "inbox" => Ok(Folder::Inbox),
            "archive" => Ok(Folder::Archive),
            "trash" => Ok(Folder::Trash),
            other => Err(AppError::InvalidInput(format!(
                "unknown folder `{other}`; expected inbox, archive or trash"
            ))),
        }
    }
}

/// Secondary classification axes assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Purpose,
    SenderType,
    ContentType,
    Priority,
    ActionRequired,
    TimeSensitivity,
    TopicDepartment,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Purpose,
        Category::SenderType,
        Category::ContentType,
        Category::Priority,
        Category::ActionRequired,
        Category::TimeSensitivity,
        Category::TopicDepartment,
    ];

    /// Wire name, used both as the email field and the list query key.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Purpose => "purpose",
            Category::SenderType => "senderType",
            Category::ContentType => "contentType",
            Category::Priority => "priority",
            Category::ActionRequired => "actionRequired",
            Category::TimeSensitivity => "timeSensitivity",
            Category::TopicDepartment => "topicDepartment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().replace(['-', '_', ' '], "");
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(&needle))
            .ok_or_else(|| AppError::InvalidInput(format!("unknown category `{}`", raw.trim())))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
}

impl Address {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_sensitivity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_department: Option<String>,
}

impl Classification {
    pub fn get(&self, category: Category) -> Option<&str> {
        let value = match category {
            Category::Purpose => &self.purpose,
            Category::SenderType => &self.sender_type,
            Category::ContentType => &self.content_type,
            Category::Priority => &self.priority,
            Category::ActionRequired => &self.action_required,
            Category::TimeSensitivity => &self.time_sensitivity,
            Category::TopicDepartment => &self.topic_department,
        };
        value.as_deref()
    }

    /// Tags worth showing as badges. Default-ish values are hidden.
    pub fn badges(&self) -> Vec<&str> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                let value = self.get(category)?;
                let hidden = matches!(
                    (category, value),
                    (Category::Priority, "Normal")
                        | (Category::ActionRequired, "Informational Only")
                        | (Category::TimeSensitivity, "Evergreen")
                );
                (!hidden).then_some(value)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from: Address,
    #[serde(default)]
    pub to: Vec<Address>,
    #[serde(default)]
    pub cc: Vec<Address>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub has_attachments: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub folder: Folder,
    #[serde(flatten)]
    pub tags: Classification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPage {
    #[serde(default)]
    pub emails: Vec<Email>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Selected values per category. OR within a category, AND across categories;
/// the backend is responsible for the semantics.
pub type Filters = BTreeMap<Category, BTreeSet<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailQuery {
    pub account_id: String,
    pub page: u32,
    pub page_size: u32,
    pub folder: Folder,
    pub search: Option<String>,
    pub filters: Filters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(default)]
    pub folders: BTreeMap<Folder, u64>,
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeMap<String, u64>>,
}

impl Counts {
    pub fn folder(&self, folder: Folder) -> u64 {
        self.folders.get(&folder).copied().unwrap_or(0)
    }

    /// Applies `delta` to a folder count, flooring at zero, and returns the
    /// delta that was actually applied.
    pub fn adjust(&mut self, folder: Folder, delta: i64) -> i64 {
        let current = self.folder(folder);
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };
        self.folders.insert(folder, next);
        next as i64 - current as i64
    }
}

/// Single-message status actions, named as the backend expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Starred,
    Unstarred,
    Archive,
    RemoveArchive,
    Trash,
    Read,
}

impl StatusAction {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusAction::Starred => "starred",
            StatusAction::Unstarred => "unstarred",
            StatusAction::Archive => "archive",
            StatusAction::RemoveArchive => "removearchive",
            StatusAction::Trash => "trash",
            StatusAction::Read => "read",
        }
    }

    /// Folder the message lands in, for actions that move it.
    pub fn destination(self) -> Option<Folder> {
        match self {
            StatusAction::Archive => Some(Folder::Archive),
            StatusAction::RemoveArchive => Some(Folder::Inbox),
            StatusAction::Trash => Some(Folder::Trash),
            StatusAction::Starred | StatusAction::Unstarred | StatusAction::Read => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Archive,
    Trash,
    Inbox,
}

impl BulkAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BulkAction::Archive => "archive",
            BulkAction::Trash => "trash",
            BulkAction::Inbox => "inbox",
        }
    }

    pub fn destination(self) -> Folder {
        match self {
            BulkAction::Archive => Folder::Archive,
            BulkAction::Trash => Folder::Trash,
            BulkAction::Inbox => Folder::Inbox,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}
