use crate::output::{print_json, print_table};
use anyhow::{Context, Result};
use clap::Subcommand;
use planner_core::password::hash_password;
use planner_core::roles::RoleSet;
use planner_core::types::Role;
use planner_core::user::User;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand definition
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Create a user
    Add {
        login: String,
        #[arg(long)]
        password: String,
        /// Role to grant (repeatable): admin, coordinator, smm, designer, videomaker, photographer
        #[arg(long = "role")]
        roles: Vec<Role>,
    },
    /// List users and their roles
    List,
    /// Replace a user's roles
    Roles { login: String, roles: Vec<Role> },
    /// Set a new password
    Passwd {
        login: String,
        #[arg(long)]
        password: String,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: UserSubcommand, json: bool) -> Result<()> {
    match subcmd {
        UserSubcommand::Add {
            login,
            password,
            roles,
        } => add(root, &login, &password, roles, json),
        UserSubcommand::List => list(root, json),
        UserSubcommand::Roles { login, roles } => set_roles(root, &login, roles, json),
        UserSubcommand::Passwd { login, password } => passwd(root, &login, &password, json),
    }
}

fn add(root: &Path, login: &str, password: &str, roles: Vec<Role>, json: bool) -> Result<()> {
    anyhow::ensure!(!password.is_empty(), "password must not be empty");
    let roles: RoleSet = roles.into_iter().collect();
    let user = User::create(root, login, hash_password(password), roles)
        .with_context(|| format!("failed to add user '{login}'"))?;
    tracing::info!("user '{}' created with id {}", user.login, user.id);

    if json {
        print_json(&user.summary())
    } else {
        println!("Added user '{}' [{}]", user.login, user.roles.describe());
        Ok(())
    }
}

fn list(root: &Path, json: bool) -> Result<()> {
    let users = User::list(root).context("failed to list users")?;
    if json {
        let summaries: Vec<_> = users.iter().map(User::summary).collect();
        return print_json(&summaries);
    }
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }
    let rows = users
        .iter()
        .map(|u| vec![u.id.to_string(), u.login.clone(), u.roles.describe()])
        .collect();
    print_table(&["ID", "LOGIN", "ROLES"], rows);
    Ok(())
}

fn set_roles(root: &Path, login: &str, roles: Vec<Role>, json: bool) -> Result<()> {
    let mut user =
        User::find_by_login(root, login).with_context(|| format!("cannot update '{login}'"))?;
    user.roles = roles.into_iter().collect();
    user.save(root)
        .with_context(|| format!("failed to save user '{login}'"))?;

    if json {
        print_json(&user.summary())
    } else {
        println!("'{}' now has roles [{}]", user.login, user.roles.describe());
        Ok(())
    }
}

fn passwd(root: &Path, login: &str, password: &str, json: bool) -> Result<()> {
    anyhow::ensure!(!password.is_empty(), "password must not be empty");
    let mut user =
        User::find_by_login(root, login).with_context(|| format!("cannot update '{login}'"))?;
    user.set_password(hash_password(password));
    user.save(root)
        .with_context(|| format!("failed to save user '{login}'"))?;

    if json {
        print_json(&serde_json::json!({ "login": user.login, "password_changed": true }))
    } else {
        println!("Password changed for '{}'", user.login);
        Ok(())
    }
}
