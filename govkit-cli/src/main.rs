//! # govkit CLI
//!
//! Inspect which adapters serve a DAO's proposal and voting modules, and
//! render proposals through them.

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::InboxSort;
use config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "govkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "govkit.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered adapters
    Adapters {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show which adapter each DAO module binds to
    Resolve {
        /// DAO core address or name (defaults to all DAOs)
        dao: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Proposal inbox across DAOs
    Proposals {
        /// DAO core address or name (defaults to all DAOs)
        dao: Option<String>,

        /// Ordering of DAOs and proposals
        #[arg(long, value_enum, default_value_t = InboxSort::Expiry)]
        sort: InboxSort,
    },

    /// Show one proposal with its vote tally
    Proposal {
        /// Proposal id including its module prefix, e.g. A3
        id: String,

        /// DAO core address or name (defaults to the first DAO)
        #[arg(long)]
        dao: Option<String>,
    },

    /// DAO overview: voting module and proposal modules
    Dao {
        /// DAO core address or name (defaults to the first DAO)
        dao: Option<String>,

        /// Also show this member's voting power
        #[arg(long)]
        member: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays machine readable
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    commands::register_adapters(&config)?;

    match cli.command {
        Commands::Adapters { json } => commands::list_adapters(json),
        Commands::Resolve { dao, json } => commands::resolve_modules(&config, dao.as_deref(), json),
        Commands::Proposals { dao, sort } => commands::inbox(&config, dao.as_deref(), sort).await,
        Commands::Proposal { id, dao } => commands::show_proposal(&config, dao.as_deref(), &id).await,
        Commands::Dao { dao, member } => {
            commands::show_dao(&config, dao.as_deref(), member.as_deref()).await
        }
    }
}
