use anyhow::Context;
use clap::Subcommand;

use crate::api::course as course_api;
use crate::cli::{connect, utils, OutputFormat};

#[derive(Subcommand)]
pub enum CourseCommands {
    #[command(about = "List courses for a term, by search filter")]
    List {
        #[arg(long, default_value = "All", help = "Search filter, e.g. All, Scheduled, Opted Out")]
        filter: String,
        #[arg(long, help = "SIS term id (defaults to the current term)")]
        term: Option<i64>,
    },

    #[command(about = "Show one course section")]
    Get {
        #[arg(help = "SIS term id")]
        term_id: i64,
        #[arg(help = "Section id")]
        section_id: i64,
    },

    #[command(about = "Remove a scheduled recording series")]
    Unschedule {
        #[arg(help = "SIS term id")]
        term_id: i64,
        #[arg(help = "Section id")]
        section_id: i64,
    },
}

pub async fn handle(cmd: CourseCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CourseCommands::List { filter, term } => {
            let (client, runtime) = connect().await?;
            let term = term
                .or(runtime.current_term_id)
                .context("no term given and the server reported no current term")?;
            let payload = course_api::get_courses(&client, &filter, term).await?;
            utils::output_payload(&output_format, "Courses", &payload)
        }

        CourseCommands::Get { term_id, section_id } => {
            let (client, _) = connect().await?;
            let payload = course_api::get_course(&client, term_id, section_id).await?;
            utils::output_payload(&output_format, "Course", &payload)
        }

        CourseCommands::Unschedule { term_id, section_id } => {
            let (client, _) = connect().await?;
            course_api::unschedule(&client, term_id, section_id).await?;
            utils::output_success(
                &output_format,
                &format!("Unscheduled section {section_id} in term {term_id}"),
                None,
            )
        }
    }
}
