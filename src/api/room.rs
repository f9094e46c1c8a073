use serde_json::{json, Value};

use super::client::ApiClient;
use crate::error::ClientError;

pub async fn get_all_rooms(client: &ApiClient) -> Result<Value, ClientError> {
    client.get("/api/rooms/all").await
}

pub async fn get_capability_options(client: &ApiClient) -> Result<Value, ClientError> {
    client.get("/api/rooms/capability_options").await
}

pub async fn get_room(client: &ApiClient, id: i64) -> Result<Value, ClientError> {
    client.get(&format!("/api/room/{id}")).await
}

pub async fn set_auditorium(
    client: &ApiClient,
    room_id: i64,
    is_auditorium: bool,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/room/auditorium",
            &json!({
                "roomId": room_id,
                "isAuditorium": is_auditorium,
            }),
        )
        .await
}

pub async fn update_room_capability(
    client: &ApiClient,
    room_id: i64,
    capability: &str,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/room/update_capability",
            &json!({
                "roomId": room_id,
                "capability": capability,
            }),
        )
        .await
}
