use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use appscale_core::{AppscaleConfig, ResourceRef};
use appscale_state::StateStore;

mod commands;
mod progress;
mod prompter;

#[derive(Parser)]
#[command(
    name = "appscale",
    about = "Manage container app scale rules",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to appscale.toml (default: ./appscale.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register and inspect container apps
    App {
        #[command(subcommand)]
        action: AppAction,
    },
    /// Manage container app secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
    /// Add, delete, and list scale rules.
    ///
    /// Flags pre-answer the wizard's prompts and are validated exactly like
    /// typed answers. Prompts without a flag are asked interactively.
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },
    /// Edit the replica scaling range
    Range {
        #[command(subcommand)]
        action: RangeAction,
    },
}

#[derive(Subcommand)]
enum AppAction {
    /// Register an empty container app
    Create { resource: ResourceRef },
    /// Show a container app (secret values are never printed)
    Show {
        resource: ResourceRef,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// List registered container apps
    List,
    /// Remove a container app
    Delete { resource: ResourceRef },
}

#[derive(Subcommand)]
enum SecretAction {
    /// Add a secret to a container app
    Add {
        resource: ResourceRef,
        #[arg(long)]
        name: String,
        #[arg(long)]
        value: String,
    },
}

#[derive(Subcommand)]
enum RuleAction {
    /// Add an HTTP or Azure queue scale rule
    Add {
        resource: ResourceRef,
        #[command(flatten)]
        answers: commands::rule::AddRuleArgs,
    },
    /// Delete a scale rule
    Delete {
        resource: ResourceRef,
        /// Rule to delete
        #[arg(long)]
        name: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List the scale rules of a container app
    List {
        resource: ResourceRef,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
enum RangeAction {
    /// Set the minimum and maximum replica count
    Edit {
        resource: ResourceRef,
        /// New range as MIN-MAX, e.g. 0-10
        #[arg(long)]
        range: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppscaleConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.log_filter()))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let store_path = config.store_path();
    let store = StateStore::open(&store_path)?;
    debug!(path = %store_path.display(), "store ready");

    match cli.command {
        Commands::App { action } => match action {
            AppAction::Create { resource } => commands::app::create(&store, &resource),
            AppAction::Show { resource, format } => commands::app::show(&store, &resource, &format),
            AppAction::List => commands::app::list(&store),
            AppAction::Delete { resource } => commands::app::delete(&store, &resource),
        },
        Commands::Secret { action } => match action {
            SecretAction::Add { resource, name, value } => {
                commands::secret::add(&store, &resource, &name, &value)
            }
        },
        Commands::Rule { action } => match action {
            RuleAction::Add { resource, answers } => {
                commands::rule::add(&store, resource, answers).await
            }
            RuleAction::Delete { resource, name, yes } => {
                commands::rule::delete(&store, resource, name, yes).await
            }
            RuleAction::List { resource, format } => {
                commands::rule::list(&store, &resource, &format)
            }
        },
        Commands::Range { action } => match action {
            RangeAction::Edit { resource, range } => {
                commands::range::edit(&store, resource, range, config.replica_ceiling()).await
            }
        },
    }
}
