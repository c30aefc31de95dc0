use crate::output::print_json;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>, json: bool) -> Result<()> {
    let name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("planner")
            .to_string()
    });

    let existed = planner_core::workspace::is_initialized(root);
    let report = planner_core::workspace::init(root, &name)
        .with_context(|| format!("failed to initialize {}", root.display()))?;
    let name = if existed {
        planner_core::config::Config::load(root)
            .map(|c| c.workspace.name)
            .unwrap_or(name)
    } else {
        name
    };

    if json {
        return print_json(&serde_json::json!({
            "root": root,
            "name": name,
            "already_initialized": existed,
            "created_config": report.created_config,
            "created_state": report.created_state,
            "created_session_key": report.created_session_key,
        }));
    }

    let created = [
        (report.created_config, planner_core::paths::CONFIG_FILE),
        (report.created_state, planner_core::paths::STATE_FILE),
        (report.created_session_key, planner_core::paths::SESSION_KEY_FILE),
    ];
    if existed && created.iter().all(|(c, _)| !c) {
        println!("Planner '{name}' already initialized at {}", root.display());
        return Ok(());
    }
    for (_, file) in created.iter().filter(|(c, _)| *c) {
        println!("  created {file}");
    }
    println!("Initialized planner '{name}' at {}", root.display());
    Ok(())
}
