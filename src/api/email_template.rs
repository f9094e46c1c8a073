use serde_json::{json, Value};

use super::client::ApiClient;
use crate::error::ClientError;

pub async fn get_all_email_templates(client: &ApiClient) -> Result<Value, ClientError> {
    client.get("/api/email_templates/all").await
}

pub async fn get_email_template(client: &ApiClient, template_id: i64) -> Result<Value, ClientError> {
    client
        .get(&format!("/api/email_template/{template_id}"))
        .await
}

pub async fn create_email_template(
    client: &ApiClient,
    template_type: &str,
    name: &str,
    subject_line: &str,
    message: &str,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/email_template/create",
            &json!({
                "templateType": template_type,
                "name": name,
                "subjectLine": subject_line,
                "message": message,
            }),
        )
        .await
}

pub async fn update_email_template(
    client: &ApiClient,
    template_id: i64,
    template_type: &str,
    name: &str,
    subject_line: &str,
    message: &str,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/email_template/update",
            &json!({
                "templateId": template_id,
                "templateType": template_type,
                "name": name,
                "subjectLine": subject_line,
                "message": message,
            }),
        )
        .await
}

pub async fn send_test_email(client: &ApiClient, template_id: i64) -> Result<Value, ClientError> {
    client
        .get(&format!("/api/email_template/test/{template_id}"))
        .await
}
