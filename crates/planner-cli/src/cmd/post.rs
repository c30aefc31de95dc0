use crate::output::{print_json, print_table};
use anyhow::{Context, Result};
use clap::Subcommand;
use planner_core::post::{Post, PostDraft, PostView};
use planner_core::query::PostQuery;
use planner_core::roles::RoleSet;
use planner_core::types::TaskKind;
use planner_core::user::User;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand definition
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum PostSubcommand {
    /// List posts, latest deadline first
    List {
        /// Only posts that require this task
        #[arg(long)]
        task: Option<TaskKind>,
        /// Only posts with work for this user
        #[arg(long)]
        mine_for: Option<String>,
    },
    /// Show one post with its task links
    Show {
        id: u64,
        /// Report edit rights for this user
        #[arg(long = "as")]
        as_user: Option<String>,
    },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        /// Post type, e.g. "Видео" or "Афиша"
        #[arg(long = "type")]
        post_type: String,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(long)]
        deadline: String,
        #[arg(long)]
        description: Option<String>,
        /// Required task (repeatable); defaults to the post type's preset
        #[arg(long = "task")]
        tasks: Vec<TaskKind>,
    },
    /// Submit a task link on behalf of a user
    Link {
        id: u64,
        kind: String,
        url: String,
        #[arg(long = "as")]
        as_user: String,
    },
    /// Delete a post
    Delete { id: u64 },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: PostSubcommand, json: bool) -> Result<()> {
    match subcmd {
        PostSubcommand::List { task, mine_for } => list(root, task, mine_for.as_deref(), json),
        PostSubcommand::Show { id, as_user } => show(root, id, as_user.as_deref(), json),
        PostSubcommand::Create {
            title,
            post_type,
            deadline,
            description,
            tasks,
        } => {
            let draft = PostDraft {
                title,
                description,
                post_type,
                deadline,
                responsible_user_id: None,
                required_tasks: (!tasks.is_empty()).then(|| tasks.into_iter().collect()),
            };
            create(root, draft, json)
        }
        PostSubcommand::Link {
            id,
            kind,
            url,
            as_user,
        } => link(root, id, kind, url, &as_user, json),
        PostSubcommand::Delete { id } => delete(root, id, json),
    }
}

fn roles_of(root: &Path, login: Option<&str>) -> Result<Option<RoleSet>> {
    login
        .map(|l| {
            User::find_by_login(root, l)
                .map(|u| u.roles)
                .with_context(|| format!("unknown user '{l}'"))
        })
        .transpose()
}

fn kinds(list: &[TaskKind]) -> String {
    if list.is_empty() {
        return "-".to_string();
    }
    list.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

fn list(root: &Path, task: Option<TaskKind>, mine_for: Option<&str>, json: bool) -> Result<()> {
    let viewer = roles_of(root, mine_for)?;
    let posts = Post::list(root).context("failed to list posts")?;
    let query = PostQuery {
        task,
        mine: mine_for.is_some(),
        month: None,
        page: 1,
        per_page: posts.len().max(1),
    };
    let page = query.run(posts, viewer.as_ref())?;
    let views: Vec<PostView> = page.items.iter().map(|p| p.view(viewer.as_ref())).collect();

    if json {
        return print_json(&views);
    }
    if views.is_empty() {
        println!("No posts.");
        return Ok(());
    }
    let rows = views
        .iter()
        .map(|v| {
            vec![
                v.post.id.to_string(),
                v.post.deadline.format("%Y-%m-%d %H:%M").to_string(),
                v.post.post_type.clone(),
                v.post.title.clone(),
                v.status.label_en.to_string(),
                kinds(&v.missing_tasks),
            ]
        })
        .collect();
    print_table(&["ID", "DEADLINE", "TYPE", "TITLE", "STATUS", "MISSING"], rows);
    Ok(())
}

fn show(root: &Path, id: u64, as_user: Option<&str>, json: bool) -> Result<()> {
    let viewer = roles_of(root, as_user)?;
    let post = Post::load(root, id).with_context(|| format!("cannot show post {id}"))?;
    let view = post.view(viewer.as_ref());
    if json {
        return print_json(&view);
    }

    println!("#{} {}", post.id, post.title);
    println!("  type:     {}", post.post_type);
    println!("  deadline: {}", post.deadline.to_rfc3339());
    if let Some(desc) = &post.description {
        println!("  about:    {desc}");
    }
    println!("  status:   {} ({})", view.status.label, view.status.label_en);
    println!();
    let rows = post
        .tasks
        .required_tasks
        .iter()
        .map(|&k| {
            vec![
                k.as_str().to_string(),
                k.label().to_string(),
                post.tasks.link(k).unwrap_or("-").to_string(),
                if view.editable_tasks.contains(&k) { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["TASK", "LABEL", "LINK", "EDITABLE"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// create / link / delete
// ---------------------------------------------------------------------------

fn create(root: &Path, draft: PostDraft, json: bool) -> Result<()> {
    let post = Post::create(root, draft).context("failed to create post")?;
    tracing::info!("post {} created", post.id);
    if json {
        return print_json(&post.view(None));
    }
    println!(
        "Created post #{} '{}' (tasks: {})",
        post.id,
        post.title,
        kinds(&post.tasks.required_tasks.iter().copied().collect::<Vec<_>>())
    );
    Ok(())
}

fn link(root: &Path, id: u64, kind: String, url: String, login: &str, json: bool) -> Result<()> {
    let user = User::find_by_login(root, login).with_context(|| format!("unknown user '{login}'"))?;
    let mut post = Post::load(root, id).with_context(|| format!("cannot update post {id}"))?;
    let links = BTreeMap::from([(kind, Some(url))]);
    let updated = post
        .apply_links(Some(&user.roles), &links)
        .with_context(|| format!("'{login}' cannot update post {id}"))?;
    post.save(root)?;

    let view = post.view(Some(&user.roles));
    if json {
        return print_json(&view);
    }
    println!(
        "Updated {} on post #{}, status: {}",
        kinds(&updated),
        post.id,
        view.status.label_en
    );
    Ok(())
}

fn delete(root: &Path, id: u64, json: bool) -> Result<()> {
    Post::delete(root, id).with_context(|| format!("cannot delete post {id}"))?;
    if json {
        print_json(&serde_json::json!({ "deleted": id }))
    } else {
        println!("Deleted post #{id}");
        Ok(())
    }
}
