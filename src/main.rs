//! followkit CLI - inspect and edit a follow graph database

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use followkit::config;
use followkit::ui;
use followkit::{MorphRef, RevokePolicy};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "followkit")]
#[command(version)]
#[command(about = "Polymorphic follow graph - followers, follow requests and acceptance")]
#[command(long_about = r#"
followkit stores "A follows B" edges between arbitrary entities, each edge
either an accepted follower or a pending follow request.

Entities are written as <type>:<key>, and their types must be declared in
followkit.toml to take part in the graph.

Example usage:
  followkit init
  followkit follow --from user:2 --to user:1 --request
  followkit accept --target user:1 --from user:2
  followkit followers --of user:1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: followkit.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Revoke policy: active-only or any (overrides the config)
    #[arg(long, global = true)]
    revoke: Option<RevokePolicy>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter followkit.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Follow an entity, or ask to with --request
    Follow {
        /// Entity doing the following
        #[arg(long)]
        from: MorphRef,

        /// Entity to follow
        #[arg(long)]
        to: MorphRef,

        /// Create a pending request instead of an accepted edge
        #[arg(long)]
        request: bool,
    },

    /// Stop following an entity
    Unfollow {
        #[arg(long)]
        from: MorphRef,

        #[arg(long)]
        to: MorphRef,
    },

    /// Withdraw a pending follow request
    Cancel {
        #[arg(long)]
        from: MorphRef,

        #[arg(long)]
        to: MorphRef,
    },

    /// Accept a pending follow request
    Accept {
        /// Entity being followed
        #[arg(long)]
        target: MorphRef,

        /// Entity that sent the request
        #[arg(long)]
        from: MorphRef,
    },

    /// Decline a pending follow request
    Decline {
        #[arg(long)]
        target: MorphRef,

        #[arg(long)]
        from: MorphRef,
    },

    /// Remove a follower
    Revoke {
        #[arg(long)]
        target: MorphRef,

        #[arg(long)]
        from: MorphRef,
    },

    /// List followers of an entity
    Followers {
        /// Entity being followed
        #[arg(long)]
        of: MorphRef,

        /// Follower type (defaults to the entity's own type)
        #[arg(long = "type")]
        kind: Option<String>,

        /// List pending requests instead of accepted followers
        #[arg(long)]
        pending: bool,
    },

    /// List entities an entity follows
    Following {
        /// Entity doing the following
        #[arg(long)]
        of: MorphRef,

        /// Followed type (defaults to the entity's own type)
        #[arg(long = "type")]
        kind: Option<String>,

        /// List pending requests instead of accepted follows
        #[arg(long)]
        pending: bool,
    },

    /// Show statistics about the graph
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Text)
    }
}

/// Print a JSON success envelope for machine-readable output
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = run(cli) {
        ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mode = cli.format;
    let session = || commands::Session::load(&config_path, cli.database.as_deref(), cli.revoke);

    match cli.command {
        Commands::Init { force } => commands::run_init(&config_path, force, mode),
        Commands::Follow { from, to, request } => commands::run_follow(&session()?, from, to, request, mode),
        Commands::Unfollow { from, to } => commands::run_unfollow(&session()?, from, to, mode),
        Commands::Cancel { from, to } => commands::run_cancel(&session()?, from, to, mode),
        Commands::Accept { target, from } => {
            commands::run_target_action(&session()?, commands::TargetAction::Accept, target, from, mode)
        }
        Commands::Decline { target, from } => {
            commands::run_target_action(&session()?, commands::TargetAction::Decline, target, from, mode)
        }
        Commands::Revoke { target, from } => {
            commands::run_target_action(&session()?, commands::TargetAction::Revoke, target, from, mode)
        }
        Commands::Followers { of, kind, pending } => {
            commands::run_followers(&session()?, of, kind.as_deref(), pending, mode)
        }
        Commands::Following { of, kind, pending } => {
            commands::run_following(&session()?, of, kind.as_deref(), pending, mode)
        }
        Commands::Stats => commands::run_stats(&session()?, mode),
    }
}
