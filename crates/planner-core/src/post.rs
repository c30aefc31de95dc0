use crate::access;
use crate::error::{PlannerError, Result};
use crate::paths;
use crate::roles::RoleSet;
use crate::state::State;
use crate::status::{self, StatusResult, TaskSheet};
use crate::types::TaskKind;
use crate::user::User;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// ---------------------------------------------------------------------------
// Post-type presets
// ---------------------------------------------------------------------------

/// Post types offered by the planner, in display order.
pub const POST_TYPES: [&str; 6] = ["Видео", "Фотопост", "Афиша", "Светлана Юрьевна", "Рубрика", "ЧЕ"];

/// Tasks a new post of `post_type` requires unless the author picks them.
/// Unknown types require nothing.
pub fn preset_tasks(post_type: &str) -> BTreeSet<TaskKind> {
    use TaskKind::*;
    let kinds: &[TaskKind] = match post_type.trim() {
        "Видео" => &[VideoMaker],
        "Фотопост" => &[PhotoCards, Photogallery, CoverPhoto],
        "Афиша" => &[CoverPhoto, VideoSmm],
        "Светлана Юрьевна" => &[VideoSmm],
        "Рубрика" => &[Text],
        "ЧЕ" => TaskKind::all(),
        _ => &[],
    };
    kinds.iter().copied().collect()
}

// ---------------------------------------------------------------------------
// PostDraft
// ---------------------------------------------------------------------------

/// Client-supplied fields for creating or editing a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub post_type: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub responsible_user_id: Option<u64>,
    /// `None` falls back to the post-type preset on create and keeps the
    /// current set on edit.
    #[serde(default)]
    pub required_tasks: Option<BTreeSet<TaskKind>>,
}

struct ValidDraft {
    title: String,
    description: Option<String>,
    post_type: String,
    deadline: DateTime<Utc>,
    responsible_user_id: Option<u64>,
    required_tasks: Option<BTreeSet<TaskKind>>,
}

impl PostDraft {
    fn validate(self) -> Result<ValidDraft> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(PlannerError::MissingField("title"));
        }
        let post_type = self.post_type.trim().to_string();
        if post_type.is_empty() {
            return Err(PlannerError::MissingField("post_type"));
        }
        if self.deadline.trim().is_empty() {
            return Err(PlannerError::MissingField("deadline"));
        }
        let deadline = parse_deadline(&self.deadline)?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok(ValidDraft {
            title,
            description,
            post_type,
            deadline,
            responsible_user_id: self.responsible_user_id,
            required_tasks: self.required_tasks,
        })
    }
}

/// A named responsible user must exist.
pub fn check_responsible(root: &Path, user_id: Option<u64>) -> Result<()> {
    let Some(id) = user_id else {
        return Ok(());
    };
    match User::load(root, id) {
        Ok(_) => Ok(()),
        Err(PlannerError::UserNotFound(_)) => Err(PlannerError::UnknownResponsible(id)),
        Err(e) => Err(e),
    }
}

/// Accepts RFC 3339, a bare `YYYY-MM-DDTHH:MM[:SS]` (read as UTC), or a bare
/// date (midnight UTC).
pub fn parse_deadline(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(PlannerError::InvalidDate(s.to_string()))
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub post_type: String,
    pub deadline: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<u64>,
    #[serde(default)]
    pub tasks: TaskSheet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn status(&self) -> StatusResult {
        status::evaluate_status(&self.tasks)
    }

    /// The post as seen by `viewer`, with derived status and edit rights.
    pub fn view(&self, viewer: Option<&RoleSet>) -> PostView {
        PostView {
            status: self.status(),
            missing_tasks: self.tasks.missing_tasks(),
            editable_tasks: access::editable_tasks(&self.tasks, viewer),
            can_edit_post: access::can_edit_post(viewer),
            post: self.clone(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, draft: PostDraft) -> Result<Self> {
        let draft = draft.validate()?;
        check_responsible(root, draft.responsible_user_id)?;
        let mut state = State::load(root)?;
        let now = Utc::now();
        let required = draft
            .required_tasks
            .unwrap_or_else(|| preset_tasks(&draft.post_type));
        let post = Post {
            id: state.allocate_post_id(),
            title: draft.title,
            description: draft.description,
            post_type: draft.post_type,
            deadline: draft.deadline,
            responsible_user_id: draft.responsible_user_id,
            tasks: TaskSheet::new(required),
            created_at: now,
            updated_at: now,
        };
        // Counter first: a failed write leaves a gap, never a reused id.
        state.save(root)?;
        post.save(root)?;
        Ok(post)
    }

    pub fn load(root: &Path, id: u64) -> Result<Self> {
        let path = paths::post_file(root, id);
        if !path.exists() {
            return Err(PlannerError::PostNotFound(id));
        }
        crate::io::read_yaml(&path)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        crate::io::write_yaml(&paths::post_file(root, self.id), self)
    }

    pub fn delete(root: &Path, id: u64) -> Result<()> {
        let path = paths::post_file(root, id);
        if !path.exists() {
            return Err(PlannerError::PostNotFound(id));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    /// Every post, latest deadline first.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::posts_dir(root);
        if !dir.exists() {
            if !paths::planner_dir(root).exists() {
                return Err(PlannerError::NotInitialized);
            }
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(id) = name
                .to_str()
                .and_then(|n| n.strip_suffix(".yaml"))
                .and_then(|n| n.parse::<u64>().ok())
            else {
                continue;
            };
            match Self::load(root, id) {
                Ok(p) => posts.push(p),
                Err(PlannerError::PostNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        posts.sort_by(|a, b| b.deadline.cmp(&a.deadline).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    /// Replace the descriptive fields, and the task set when the draft names
    /// one. Links already submitted are kept.
    pub fn update_details(&mut self, draft: PostDraft) -> Result<()> {
        let draft = draft.validate()?;
        self.title = draft.title;
        self.description = draft.description;
        self.post_type = draft.post_type;
        self.deadline = draft.deadline;
        self.responsible_user_id = draft.responsible_user_id;
        if let Some(required) = draft.required_tasks {
            self.tasks.required_tasks = required;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Store submitted links on behalf of `viewer`.
    ///
    /// Every key must name a required task the viewer may edit; otherwise
    /// nothing is written and the offending keys are reported. Values are
    /// trimmed and a blank value clears the link.
    pub fn apply_links(
        &mut self,
        viewer: Option<&RoleSet>,
        links: &BTreeMap<String, Option<String>>,
    ) -> Result<Vec<TaskKind>> {
        if viewer.is_none() {
            return Err(PlannerError::Unauthenticated);
        }
        let denied: Vec<&str> = links
            .keys()
            .filter(|k| !self.accepts_link(viewer, k))
            .map(String::as_str)
            .collect();
        if !denied.is_empty() {
            return Err(PlannerError::Forbidden(format!(
                "cannot edit task link(s): {}",
                denied.join(", ")
            )));
        }

        let mut updated = Vec::with_capacity(links.len());
        for (name, value) in links {
            // Every key parsed in the permission check above.
            let Ok(kind) = name.parse::<TaskKind>() else {
                continue;
            };
            self.tasks.set_link(kind, value.as_deref());
            updated.push(kind);
        }
        if !updated.is_empty() {
            self.updated_at = Utc::now();
        }
        Ok(updated)
    }

    /// A link is accepted only for a required task the viewer may edit.
    fn accepts_link(&self, viewer: Option<&RoleSet>, kind: &str) -> bool {
        access::can_edit_task_named(viewer, kind)
            && kind.parse::<TaskKind>().is_ok_and(|k| self.tasks.requires(k))
    }
}

/// A post plus the values derived for one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub status: StatusResult,
    pub missing_tasks: Vec<TaskKind>,
    pub editable_tasks: Vec<TaskKind>,
    pub can_edit_post: bool,
}
