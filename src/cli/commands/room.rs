use clap::Subcommand;

use crate::api::room as room_api;
use crate::cli::{connect, utils, OutputFormat};

#[derive(Subcommand)]
pub enum RoomCommands {
    #[command(about = "List all capture-capable rooms")]
    List,

    #[command(about = "Show one room")]
    Get {
        #[arg(help = "Room id")]
        id: i64,
    },

    #[command(about = "List room capability options")]
    Capabilities,
}

pub async fn handle(cmd: RoomCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RoomCommands::List => {
            let (client, _) = connect().await?;
            let payload = room_api::get_all_rooms(&client).await?;
            utils::output_payload(&output_format, "Rooms", &payload)
        }

        RoomCommands::Get { id } => {
            let (client, _) = connect().await?;
            let payload = room_api::get_room(&client, id).await?;
            utils::output_payload(&output_format, "Room", &payload)
        }

        RoomCommands::Capabilities => {
            let (client, _) = connect().await?;
            let payload = room_api::get_capability_options(&client).await?;
            utils::output_payload(&output_format, "Capability options", &payload)
        }
    }
}
