use serde_json::Value;

use super::client::ApiClient;
use crate::error::ClientError;

pub async fn get_available_jobs(client: &ApiClient) -> Result<Value, ClientError> {
    client.get("/api/jobs/available").await
}

pub async fn get_job_history(client: &ApiClient, days_count: u32) -> Result<Value, ClientError> {
    client
        .get(&format!("/api/job/history/{days_count}"))
        .await
}

pub async fn start_job(client: &ApiClient, job_key: &str) -> Result<Value, ClientError> {
    client.get(&format!("/api/job/{job_key}/start")).await
}
