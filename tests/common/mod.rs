#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use scribe_admin::api::client::ApiClient;
use scribe_admin::context::AppContext;
use scribe_admin::router::Router;
use scribe_admin::session::Session;

/// In-process stand-in for the remote API. Responses are scripted per path;
/// every request is counted so tests can assert how often an endpoint was
/// actually hit.
pub struct StubApi {
    pub base_url: String,
    state: Arc<StubState>,
}

struct StubState {
    profile: Mutex<Value>,
    responses: Mutex<HashMap<String, (u16, Value)>>,
    hits: Mutex<HashMap<String, u32>>,
}

impl StubApi {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;

        let state = Arc::new(StubState {
            profile: Mutex::new(anonymous_profile()),
            responses: Mutex::new(HashMap::from([(
                "/api/config".to_string(),
                (200, default_config()),
            )])),
            hits: Mutex::new(HashMap::new()),
        });

        let app = axum::Router::new()
            .fallback(respond)
            .with_state(state.clone());
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("failed to bind stub api")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    /// What `GET /api/user/my_profile` returns from now on.
    pub fn set_profile(&self, profile: Value) {
        *self.state.profile.lock().unwrap() = profile;
    }

    /// Script a response for one path (any method).
    pub fn script(&self, path: &str, status: u16, body: Value) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    /// How many requests this path has served.
    pub fn hits(&self, path: &str) -> u32 {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }
}

async fn respond(State(state): State<Arc<StubState>>, uri: Uri) -> impl IntoResponse {
    let path = uri.path().to_string();
    *state.hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    if path == "/api/user/my_profile" {
        let profile = state.profile.lock().unwrap().clone();
        return (StatusCode::OK, Json(profile));
    }

    let scripted = state.responses.lock().unwrap().get(&path).cloned();
    match scripted {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Not found" })),
        ),
    }
}

/// One isolated client core wired against a stub API: its own session,
/// context, and router, sharing nothing with other tests.
pub struct Harness {
    pub client: ApiClient,
    pub session: Arc<Session>,
    pub context: Arc<AppContext>,
    pub router: Arc<Router>,
}

pub fn harness_for(server: &StubApi) -> Result<Harness> {
    let session = Arc::new(Session::new());
    let context = AppContext::new();
    let router = Router::new(session.clone(), context.clone());
    let client = ApiClient::with_base_url(server.base_url.clone(), session.clone(), router.clone())?;
    Ok(Harness {
        client,
        session,
        context,
        router,
    })
}

pub fn anonymous_profile() -> Value {
    json!({
        "isAuthenticated": false,
        "isAdmin": false,
        "isTeaching": false,
        "uid": null,
    })
}

pub fn admin_profile() -> Value {
    json!({
        "isAuthenticated": true,
        "isAdmin": true,
        "isTeaching": false,
        "uid": "100100",
        "name": "Dana Okafor",
    })
}

pub fn instructor_profile() -> Value {
    json!({
        "isAuthenticated": true,
        "isAdmin": false,
        "isTeaching": true,
        "uid": "300847",
        "name": "Joan Lambert",
        "courses": [{ "sectionId": 12345, "termId": 2252 }],
    })
}

pub fn default_config() -> Value {
    json!({
        "currentTermId": 2252,
        "currentTermName": "Spring 2025",
        "devAuthEnabled": true,
        "emailTemplateTypes": { "invitation": "Invitation" },
        "roomCapabilityOptions": { "screencast": "Screencast" },
        "searchFilterOptions": ["All", "Scheduled"],
        "searchItemsPerPage": 50,
        "supportEmailAddress": "capture-support@example.edu",
        "timezone": "America/Los_Angeles",
    })
}
