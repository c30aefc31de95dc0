//! Completion status of a post, derived from its task sheet.
//!
//! A post is complete when every required task has a submitted link. Kinds
//! that are not required never affect the result, whatever their link says.

use crate::types::TaskKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskSheet
// ---------------------------------------------------------------------------

/// The required tasks of a post and the links submitted for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSheet {
    #[serde(default)]
    pub required_tasks: BTreeSet<TaskKind>,
    #[serde(default)]
    pub task_links: BTreeMap<TaskKind, Option<String>>,
}

impl TaskSheet {
    pub fn new(required_tasks: impl IntoIterator<Item = TaskKind>) -> Self {
        Self {
            required_tasks: required_tasks.into_iter().collect(),
            task_links: BTreeMap::new(),
        }
    }

    pub fn requires(&self, kind: TaskKind) -> bool {
        self.required_tasks.contains(&kind)
    }

    /// The raw link for `kind`, if one was stored.
    pub fn link(&self, kind: TaskKind) -> Option<&str> {
        self.task_links.get(&kind).and_then(|l| l.as_deref())
    }

    /// Store a link, normalizing blank input to "not submitted".
    pub fn set_link(&mut self, kind: TaskKind, link: Option<&str>) {
        let value = link.map(str::trim).filter(|l| !l.is_empty()).map(str::to_string);
        self.task_links.insert(kind, value);
    }

    pub fn is_submitted(&self, kind: TaskKind) -> bool {
        is_submitted(self.link(kind))
    }

    /// Required kinds that still lack a link, in registry order.
    pub fn missing_tasks(&self) -> Vec<TaskKind> {
        self.required_tasks
            .iter()
            .copied()
            .filter(|&k| !self.is_submitted(k))
            .collect()
    }
}

/// A link counts as submitted when it is present and not whitespace-only.
pub fn is_submitted(link: Option<&str>) -> bool {
    link.is_some_and(|l| !l.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Complete,
    Incomplete,
}

/// Presentation hint for a status. Styling is left to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Success,
    Pending,
}

impl PostStatus {
    pub fn label(self) -> &'static str {
        match self {
            PostStatus::Complete => "Завершен",
            PostStatus::Incomplete => "В работе",
        }
    }

    pub fn label_en(self) -> &'static str {
        match self {
            PostStatus::Complete => "Done",
            PostStatus::Incomplete => "In progress",
        }
    }

    pub fn category(self) -> StatusCategory {
        match self {
            PostStatus::Complete => StatusCategory::Success,
            PostStatus::Incomplete => StatusCategory::Pending,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Complete => f.write_str("complete"),
            PostStatus::Incomplete => f.write_str("incomplete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub status: PostStatus,
    pub complete: bool,
    pub label: &'static str,
    pub label_en: &'static str,
    pub category: StatusCategory,
}

impl From<PostStatus> for StatusResult {
    fn from(status: PostStatus) -> Self {
        Self {
            status,
            complete: status == PostStatus::Complete,
            label: status.label(),
            label_en: status.label_en(),
            category: status.category(),
        }
    }
}

pub fn is_complete(sheet: &TaskSheet) -> bool {
    sheet.required_tasks.iter().all(|&k| sheet.is_submitted(k))
}

pub fn evaluate_status(sheet: &TaskSheet) -> StatusResult {
    let status = if is_complete(sheet) {
        PostStatus::Complete
    } else {
        PostStatus::Incomplete
    };
    status.into()
}
