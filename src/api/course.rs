use serde_json::{json, Value};

use super::client::ApiClient;
use crate::error::ClientError;

pub async fn get_course(
    client: &ApiClient,
    term_id: i64,
    section_id: i64,
) -> Result<Value, ClientError> {
    client
        .get(&format!("/api/course/{term_id}/{section_id}"))
        .await
}

pub async fn get_courses(
    client: &ApiClient,
    filter: &str,
    term_id: i64,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/courses",
            &json!({
                "filter": filter,
                "termId": term_id,
            }),
        )
        .await
}

pub async fn approve(
    client: &ApiClient,
    publish_type: &str,
    recording_type: &str,
    section_id: i64,
    instructor_proxies: Option<&Value>,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/course/approve",
            &json!({
                "instructorProxies": instructor_proxies,
                "publishType": publish_type,
                "recordingType": recording_type,
                "sectionId": section_id,
            }),
        )
        .await
}

pub async fn unschedule(
    client: &ApiClient,
    term_id: i64,
    section_id: i64,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/course/unschedule",
            &json!({
                "termId": term_id,
                "sectionId": section_id,
            }),
        )
        .await
}

pub async fn update_opt_out(
    client: &ApiClient,
    term_id: i64,
    section_id: i64,
    opt_out: bool,
) -> Result<Value, ClientError> {
    client
        .post(
            "/api/course/opt_out/update",
            &json!({
                "optOut": opt_out,
                "sectionId": section_id,
                "termId": term_id,
            }),
        )
        .await
}
