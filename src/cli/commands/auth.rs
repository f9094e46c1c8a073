use std::io::{BufRead, Write};

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::api::auth as auth_api;
use crate::cli::{connect, utils, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with developer credentials")]
    Login {
        #[arg(help = "Campus UID")]
        uid: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Show the current identity snapshot")]
    Whoami,

    #[command(about = "Show session and service status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { uid, password } => {
            let (client, runtime) = connect().await?;
            if !runtime.dev_auth_enabled {
                anyhow::bail!("developer auth is disabled on this server");
            }

            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };

            let user = auth_api::dev_auth_login(&client, &uid, &password).await?;
            if user.is_authenticated {
                utils::output_success(
                    &output_format,
                    &format!("Logged in as {}", uid),
                    Some(json!({
                        "isAdmin": user.is_admin,
                        "isTeaching": user.is_teaching,
                    })),
                )
            } else {
                utils::output_error(&output_format, "Login failed")?;
                anyhow::bail!("login rejected for uid {uid}");
            }
        }

        AuthCommands::Whoami => {
            let (client, _) = connect().await?;
            let user = client.session().current_user();
            utils::output_payload(
                &output_format,
                "Current identity",
                &serde_json::to_value(user.as_ref())?,
            )
        }

        AuthCommands::Status => {
            let (client, runtime) = connect().await?;
            let user = client.session().current_user();
            utils::output_success(
                &output_format,
                if user.is_authenticated {
                    "Session established"
                } else {
                    "Not logged in"
                },
                Some(json!({
                    "isAuthenticated": user.is_authenticated,
                    "isAdmin": user.is_admin,
                    "isTeaching": user.is_teaching,
                    "currentTermName": runtime.current_term_name.clone(),
                    "checkedAt": chrono::Utc::now(),
                })),
            )
        }
    }
}

fn prompt_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush().ok();
    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("failed to read password from stdin")?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}
