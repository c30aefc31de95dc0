mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{post::PostSubcommand, user::UserSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "planner",
    about = "Content planner: posts, required tasks and who may submit them",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .planner/)
    #[arg(long, global = true, env = "PLANNER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a planner workspace in the root directory
    Init {
        /// Workspace name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Run the JSON API server
    Serve {
        /// Port to listen on (default: server.port from config, 0 = OS-assigned)
        #[arg(long)]
        port: Option<u16>,

        /// Open a browser once listening
        #[arg(long)]
        open: bool,
    },

    /// Manage users and roles
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Manage posts and task links
    Post {
        #[command(subcommand)]
        subcommand: PostSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref(), cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
        Commands::User { subcommand } => cmd::user::run(&root, subcommand, cli.json),
        Commands::Post { subcommand } => cmd::post::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
