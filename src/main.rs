use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use wellbeing_survey::config::{ServerConfig, SurveyConfig};
use wellbeing_survey::store::{Database, LibSqlBackend, SettingsDeviceStore};
use wellbeing_survey::submit::HttpSubmitter;
use wellbeing_survey::surface::{ChatEnd, TerminalSurface, run_chat};
use wellbeing_survey::survey::SurveyRunner;

#[derive(Parser, Debug)]
#[command(name = "wellbeing-survey", version, about = "Conversational wellbeing check-in survey")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take the survey in this terminal
    Chat(ChatArgs),
    /// Run the collection service that accepts and exports responses
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
struct ChatArgs {
    /// Base URL of the collection service
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Device database holding the participant id and completion flag
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    #[arg(long)]
    port: Option<u16>,

    /// Response database
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Allow a participant to answer again after this many days
    #[arg(long, value_name = "DAYS")]
    resubmit_after_days: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The chat owns stdout; keep logs on stderr and quiet by default there.
    let default_level = match cli.command {
        Commands::Chat(_) => "warn",
        Commands::Serve(_) => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat(args) => chat(args).await,
        Commands::Serve(args) => serve(args).await,
    }
}

async fn chat(args: ChatArgs) -> Result<()> {
    let mut config = SurveyConfig::from_env()?;
    if let Some(url) = args.url {
        config.submit_url = url;
    }
    if let Some(db) = args.db {
        config.db_path = db;
    }

    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);
    let device = Arc::new(SettingsDeviceStore::new(db));
    let submitter = Arc::new(HttpSubmitter::new(&config.submit_url));
    let mut runner = SurveyRunner::new(config.flow, device, submitter, TerminalSurface::stdout());

    let end = run_chat(&mut runner, BufReader::new(tokio::io::stdin())).await?;
    tracing::info!(?end, "Chat session ended");
    if end == ChatEnd::Unsent {
        eprintln!("Responses were not sent. Run `wellbeing-survey chat` again once the service is reachable.");
    }
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if args.resubmit_after_days.is_some() {
        config.resubmit_after_days = args.resubmit_after_days;
    }

    wellbeing_survey::server::serve(&config).await?;
    Ok(())
}
