use clap::Subcommand;

use crate::api::email_template as template_api;
use crate::cli::{connect, utils, OutputFormat};

#[derive(Subcommand)]
pub enum TemplateCommands {
    #[command(about = "List all email templates")]
    List,

    #[command(about = "Show one email template")]
    Get {
        #[arg(help = "Template id")]
        id: i64,
    },

    #[command(about = "Send a test rendering of a template to yourself")]
    Test {
        #[arg(help = "Template id")]
        id: i64,
    },
}

pub async fn handle(cmd: TemplateCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TemplateCommands::List => {
            let (client, _) = connect().await?;
            let payload = template_api::get_all_email_templates(&client).await?;
            utils::output_payload(&output_format, "Email templates", &payload)
        }

        TemplateCommands::Get { id } => {
            let (client, _) = connect().await?;
            let payload = template_api::get_email_template(&client, id).await?;
            utils::output_payload(&output_format, "Email template", &payload)
        }

        TemplateCommands::Test { id } => {
            let (client, _) = connect().await?;
            template_api::send_test_email(&client, id).await?;
            utils::output_success(&output_format, &format!("Test email sent for template {id}"), None)
        }
    }
}
