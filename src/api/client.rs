// The intercepting HTTP client every remote call goes through.
//
// Success unwraps the payload. An authentication failure triggers exactly
// one identity refresh before the error is surfaced; the original call is
// never retried and its error always reaches the caller.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde_json::Value;

use crate::config;
use crate::error::ClientError;
use crate::router::{Router, ERROR_PATH, LOGIN_PATH, NOT_FOUND_PATH, SESSION_EXPIRED_MESSAGE};
use crate::session::{CurrentUser, Session};

const PROFILE_PATH: &str = "/api/user/my_profile";

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    router: Arc<Router>,
}

impl ApiClient {
    /// Client against the configured API base URL.
    pub fn new(session: Arc<Session>, router: Arc<Router>) -> Result<Self, ClientError> {
        let base_url = config::config().api_base_url.clone();
        Self::with_base_url(base_url, session, router)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        session: Arc<Session>,
        router: Arc<Router>,
    ) -> Result<Self, ClientError> {
        let http_config = &config::config().http;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(&http_config.user_agent)
            .timeout(Duration::from_secs(http_config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            router,
        })
    }

    pub fn session(&self) -> Arc<Session> {
        self.session.clone()
    }

    pub fn router(&self) -> Arc<Router> {
        self.router.clone()
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.dispatch(self.http.get(self.endpoint(path))).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.dispatch(self.http.post(self.endpoint(path)).json(body))
            .await
    }

    /// Re-establish who is viewing. Always resolves to a whole snapshot:
    /// fetch or decode failure becomes the logged-out state. Safe to race
    /// with itself; the last call to complete wins.
    pub async fn refresh_identity(&self) -> Arc<CurrentUser> {
        let fetched = self.fetch_profile().await;
        self.session.install_profile(fetched)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        // A pure transport failure has no status to classify and no server
        // message to show; it propagates without navigation
        let response = request.send().await.map_err(ClientError::Transport)?;
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: Response) -> Result<Value, ClientError> {
        let status = response.status();
        if status.is_success() {
            return decode_payload(response).await;
        }

        let message = error_message(response).await;
        let error = ClientError::from_status(status, message);

        if error.is_auth_failure() {
            // The session may have expired mid-flight. Refresh once, then
            // classify; the original call is not retried.
            let refreshed = self.refresh_identity().await;
            if !refreshed.is_authenticated {
                self.router
                    .push_with_query(LOGIN_PATH, &[("m", SESSION_EXPIRED_MESSAGE)]);
                return Err(error);
            }
        }

        self.surface(&error);
        Err(error)
    }

    /// Navigation side effect for a failed call. The error itself still
    /// reaches the caller; nothing is swallowed here.
    fn surface(&self, error: &ClientError) {
        if error.is_not_found() {
            self.router.push(NOT_FOUND_PATH);
            return;
        }
        if !self.session.current_user().is_authenticated {
            // No session: the login view is the caller and renders the
            // failure inline
            return;
        }
        if error.status().is_some_and(|status| status >= 400) {
            self.router
                .push_with_query(ERROR_PATH, &[("m", &error.message())]);
        }
    }

    /// Plain profile fetch, outside the interceptor path: a refresh that
    /// fails must resolve to the logged-out snapshot, not trigger another
    /// refresh.
    async fn fetch_profile(&self) -> Result<Value, ClientError> {
        let response = self
            .http
            .get(self.endpoint(PROFILE_PATH))
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::from_status(status, error_message(response).await));
        }
        decode_payload(response).await
    }
}

async fn decode_payload(response: Response) -> Result<Value, ClientError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        response
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    } else {
        // Non-JSON payloads (CSV exports and the like) pass through as text
        let text = response.text().await.map_err(ClientError::Transport)?;
        Ok(Value::String(text))
    }
}

/// Server-supplied `message` field, verbatim, with the status reason as the
/// fallback.
async fn error_message(response: Response) -> String {
    let fallback = response
        .status()
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    match response.text().await {
        Ok(body) => serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|message| message.as_str())
                    .map(str::to_string)
            })
            .filter(|message| !message.is_empty())
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppContext;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let session = Arc::new(Session::new());
        let router = Router::new(session.clone(), AppContext::new());
        let client =
            ApiClient::with_base_url("http://localhost:5000/", session, router).unwrap();
        assert_eq!(
            client.endpoint("/api/rooms/all"),
            "http://localhost:5000/api/rooms/all"
        );
    }
}
