use serde_json::{json, Value};

use super::client::ApiClient;
use crate::error::ClientError;

pub async fn get_user(client: &ApiClient, uid: &str) -> Result<Value, ClientError> {
    client.get(&format!("/api/user/{uid}")).await
}

pub async fn get_admin_users(client: &ApiClient) -> Result<Value, ClientError> {
    client.get("/api/users/admins").await
}

pub async fn search_users(client: &ApiClient, snippet: &str) -> Result<Value, ClientError> {
    client
        .post("/api/users/search", &json!({ "snippet": snippet }))
        .await
}
