pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::context::AppContext;
use crate::router::Router;
use crate::session::{self, RuntimeConfig, Session};

#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "Scribe CLI - administrative client for the course-capture service")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session state")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Course scheduling and approval operations")]
    Course {
        #[command(subcommand)]
        cmd: commands::course::CourseCommands,
    },

    #[command(about = "Recording room management")]
    Room {
        #[command(subcommand)]
        cmd: commands::room::RoomCommands,
    },

    #[command(about = "Background job control")]
    Job {
        #[command(subcommand)]
        cmd: commands::job::JobCommands,
    },

    #[command(about = "Email template management")]
    Template {
        #[command(subcommand)]
        cmd: commands::template::TemplateCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Course { cmd } => commands::course::handle(cmd, output_format).await,
        Commands::Room { cmd } => commands::room::handle(cmd, output_format).await,
        Commands::Job { cmd } => commands::job::handle(cmd, output_format).await,
        Commands::Template { cmd } => commands::template::handle(cmd, output_format).await,
    }
}

/// Build a client against the shared session and run the bootstrap
/// sequence, the same identity-then-config order a mounting shell uses.
pub(crate) async fn connect() -> anyhow::Result<(ApiClient, Arc<RuntimeConfig>)> {
    let session = Session::global();
    let router = Router::new(session.clone(), AppContext::global());
    let client = ApiClient::new(session, router)?;
    let runtime = session::bootstrap(&client).await?;
    Ok((client, runtime))
}
