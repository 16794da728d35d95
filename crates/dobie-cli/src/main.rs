//! dobie - project run controller CLI

use clap::{Parser, Subcommand};
use dobie_cli::commands;
use dobie_client::{create_client, FileKind, OrchestratorClient};
use dobie_config::GlobalConfig;
use dobie_core::{resolve_project, PageState, RunController};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "dobie")]
#[command(author, version, about = "Project run controller for the orchestration service", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Orchestration service base URL (overrides config and DOBIE_SERVER)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a project's run status
    Status {
        /// Project id or name
        project: String,
    },

    /// Generate a project's build files
    Build {
        /// Project id or name
        project: String,
    },

    /// Start a project's containers
    Start {
        /// Project id or name
        project: String,
    },

    /// Stop a project's containers
    Stop {
        /// Project id or name
        project: String,
    },

    /// Delete a project
    Delete {
        /// Project id or name
        project: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print the generated nginx.conf
    Nginx {
        /// Project id or name
        project: String,
    },

    /// Print the generated docker-compose.yml
    Compose {
        /// Project id or name
        project: String,
    },

    /// Open the interactive run page
    Tui {
        /// Project id or name
        project: String,
    },

    /// Show or edit global configuration
    Config {
        /// Open config in editor
        #[arg(short, long)]
        edit: bool,
        /// Print the config file location only
        #[arg(long, conflicts_with = "edit")]
        path: bool,
    },
}

impl Commands {
    fn project(&self) -> Option<&str> {
        match self {
            Commands::Status { project }
            | Commands::Build { project }
            | Commands::Start { project }
            | Commands::Stop { project }
            | Commands::Delete { project, .. }
            | Commands::Nginx { project }
            | Commands::Compose { project }
            | Commands::Tui { project } => Some(project),
            Commands::Config { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Config command doesn't need the service
    if let Commands::Config { edit, path } = &cli.command {
        return commands::config(*edit, *path).await;
    }

    let mut config = GlobalConfig::load()?;
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }

    let Some(reference) = cli.command.project() else {
        return Ok(());
    };
    let project = resolve_project(&config, reference)?;
    tracing::debug!("Resolved '{}' to project {}", reference, project.id);

    let client: Arc<dyn OrchestratorClient> = Arc::from(create_client(&config)?);
    let state = PageState::new(project, config.behavior.build_failure);

    if let Commands::Tui { .. } = cli.command {
        return commands::tui(client, state).await;
    }

    let mut controller = RunController::new(client, state);
    match cli.command {
        Commands::Status { .. } => commands::status(&mut controller).await,
        Commands::Build { .. } => commands::build(&mut controller).await,
        Commands::Start { .. } => commands::start(&mut controller).await,
        Commands::Stop { .. } => commands::stop(&mut controller).await,
        Commands::Delete { yes, .. } => commands::delete(&mut controller, yes).await,
        Commands::Nginx { .. } => commands::view_file(&mut controller, FileKind::Nginx).await,
        Commands::Compose { .. } => {
            commands::view_file(&mut controller, FileKind::DockerCompose).await
        }
        Commands::Tui { .. } | Commands::Config { .. } => unreachable!(), // Handled above
    }
}
