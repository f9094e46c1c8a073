use std::sync::Arc;

use serde_json::{json, Value};

use super::client::ApiClient;
use crate::error::ClientError;
use crate::session::CurrentUser;

/// Password login for environments with developer auth enabled. The
/// returned profile becomes the new identity snapshot.
pub async fn dev_auth_login(
    client: &ApiClient,
    uid: &str,
    password: &str,
) -> Result<Arc<CurrentUser>, ClientError> {
    let payload = client
        .post(
            "/api/auth/dev_auth_login",
            &json!({
                "uid": uid,
                "password": password,
            }),
        )
        .await?;
    Ok(client.session().install_profile(Ok(payload)))
}

pub async fn cas_login_url(client: &ApiClient) -> Result<Value, ClientError> {
    client.get("/api/auth/cas_login_url").await
}

pub async fn cas_logout_url(client: &ApiClient) -> Result<Value, ClientError> {
    client.get("/api/auth/logout").await
}
