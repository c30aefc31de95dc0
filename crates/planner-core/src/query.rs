//! Filtering, paging and month grouping over post lists.

use crate::access;
use crate::error::{PlannerError, Result};
use crate::post::Post;
use crate::roles::RoleSet;
use crate::types::TaskKind;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    /// Only posts that require this task.
    pub task: Option<TaskKind>,
    /// Only posts relevant to the viewer ("my tasks").
    pub mine: bool,
    /// Only posts whose deadline falls in this `(year, month)`.
    pub month: Option<(i32, u32)>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
}

impl PostQuery {
    pub fn validate(&self) -> Result<()> {
        if let Some((_, month)) = self.month {
            if !(1..=12).contains(&month) {
                return Err(PlannerError::InvalidQuery(format!(
                    "month must be 1-12, got {month}"
                )));
            }
        }
        if self.per_page == 0 {
            return Err(PlannerError::InvalidQuery("per_page must be at least 1".into()));
        }
        Ok(())
    }

    pub fn matches(&self, post: &Post, viewer: Option<&RoleSet>) -> bool {
        if let Some(kind) = self.task {
            if !access::matches_task_filter(&post.tasks, kind) {
                return false;
            }
        }
        if self.mine && !access::is_relevant_to_user(&post.tasks, viewer) {
            return false;
        }
        if let Some((year, month)) = self.month {
            if post.deadline.year() != year || post.deadline.month() != month {
                return false;
            }
        }
        true
    }

    /// Filter `posts` (already in display order) and cut out the requested
    /// page. Pages past the end are empty.
    pub fn run(&self, posts: Vec<Post>, viewer: Option<&RoleSet>) -> Result<Page<Post>> {
        self.validate()?;
        let matching: Vec<Post> = posts
            .into_iter()
            .filter(|p| self.matches(p, viewer))
            .collect();
        let total = matching.len();
        let page = self.page.max(1);
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(self.per_page))
            .take(self.per_page)
            .collect();
        Ok(Page {
            items,
            page,
            per_page: self.per_page,
            total,
            pages: total.div_ceil(self.per_page),
        })
    }
}

/// Posts whose deadline falls in `year`/`month`, grouped by day of month.
/// Within a day, posts are ordered by deadline.
pub fn calendar_month(posts: &[Post], year: i32, month: u32) -> Result<BTreeMap<u32, Vec<Post>>> {
    if !(1..=12).contains(&month) {
        return Err(PlannerError::InvalidQuery(format!(
            "month must be 1-12, got {month}"
        )));
    }
    let mut days: BTreeMap<u32, Vec<Post>> = BTreeMap::new();
    for post in posts {
        if post.deadline.year() == year && post.deadline.month() == month {
            days.entry(post.deadline.day()).or_default().push(post.clone());
        }
    }
    for day in days.values_mut() {
        day.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.id.cmp(&b.id)));
    }
    Ok(days)
}
