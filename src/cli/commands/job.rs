use clap::Subcommand;

use crate::api::job as job_api;
use crate::cli::{connect, utils, OutputFormat};

#[derive(Subcommand)]
pub enum JobCommands {
    #[command(about = "List runnable background jobs")]
    List,

    #[command(about = "Show recent job runs")]
    History {
        #[arg(long, default_value_t = 3, help = "How many days back to report")]
        days: u32,
    },

    #[command(about = "Start a background job now")]
    Start {
        #[arg(help = "Job key, e.g. emails_queued")]
        key: String,
    },
}

pub async fn handle(cmd: JobCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        JobCommands::List => {
            let (client, _) = connect().await?;
            let payload = job_api::get_available_jobs(&client).await?;
            utils::output_payload(&output_format, "Jobs", &payload)
        }

        JobCommands::History { days } => {
            let (client, _) = connect().await?;
            let payload = job_api::get_job_history(&client, days).await?;
            utils::output_payload(&output_format, "Job history", &payload)
        }

        JobCommands::Start { key } => {
            let (client, _) = connect().await?;
            job_api::start_job(&client, &key).await?;
            utils::output_success(&output_format, &format!("Job '{key}' started"), None)
        }
    }
}
