// Session state: who is viewing, and the post-login runtime config.
//
// The snapshot is replaced wholesale by the refresh protocol and never
// mutated field-by-field; readers hold an Arc and can never observe a
// half-written record.

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::error::ClientError;

/// Identity snapshot for the current visitor.
///
/// A logged-out visitor is a valid snapshot with `is_authenticated = false`,
/// not an absence of one. Profile fields the core does not interpret are
/// retained verbatim in `profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentUser {
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub is_teaching: bool,
    pub uid: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl CurrentUser {
    /// The logged-out snapshot: all role flags false, no profile.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Post-authentication configuration blob served by the remote API.
///
/// Fetched once per bootstrap, after the first identity refresh and before
/// any routed view is mounted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    pub current_term_id: Option<i64>,
    pub current_term_name: Option<String>,
    pub dev_auth_enabled: bool,
    pub email_template_types: Value,
    pub room_capability_options: Value,
    pub search_filter_options: Value,
    pub search_items_per_page: Option<u32>,
    pub support_email_address: Option<String>,
    pub timezone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Process-wide session state: the one live identity snapshot plus the
/// runtime config. The only writer is the refresh protocol in this module;
/// everything else reads.
pub struct Session {
    current: RwLock<Arc<CurrentUser>>,
    runtime_config: RwLock<Option<Arc<RuntimeConfig>>>,
}

static SESSION: Lazy<Arc<Session>> = Lazy::new(|| Arc::new(Session::new()));

impl Session {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CurrentUser::anonymous())),
            runtime_config: RwLock::new(None),
        }
    }

    /// The shared process-wide session. Tests construct their own instances.
    pub fn global() -> Arc<Session> {
        SESSION.clone()
    }

    /// Current identity snapshot. Cheap; clones an Arc under a read lock.
    pub fn current_user(&self) -> Arc<CurrentUser> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn runtime_config(&self) -> Option<Arc<RuntimeConfig>> {
        self.runtime_config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Install the outcome of one profile fetch as the new snapshot.
    ///
    /// A fetch or decode failure is not an error path here: it becomes the
    /// anonymous snapshot, the valid "not logged in" terminal state. Under
    /// concurrent refreshes the last call to complete wins; the swap is
    /// atomic from any reader's perspective.
    pub(crate) fn install_profile(&self, fetched: Result<Value, ClientError>) -> Arc<CurrentUser> {
        let user = match fetched {
            Ok(payload) => match serde_json::from_value::<CurrentUser>(payload) {
                Ok(user) => user,
                Err(err) => {
                    tracing::warn!("profile payload did not decode, treating as logged out: {err}");
                    CurrentUser::anonymous()
                }
            },
            Err(err) => {
                tracing::info!("profile fetch failed, treating as logged out: {err}");
                CurrentUser::anonymous()
            }
        };
        self.replace(user)
    }

    fn replace(&self, user: CurrentUser) -> Arc<CurrentUser> {
        let user = Arc::new(user);
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = user.clone();
        user
    }

    pub(crate) fn set_runtime_config(&self, config: RuntimeConfig) -> Arc<RuntimeConfig> {
        let config = Arc::new(config);
        let mut slot = self
            .runtime_config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(config.clone());
        config
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity snapshot from the shared process-wide session.
pub fn current_user() -> Arc<CurrentUser> {
    Session::global().current_user()
}

/// Establish session state before any routed view runs: refresh identity,
/// then fetch the runtime config. Returns the config so the shell can mount.
pub async fn bootstrap(client: &ApiClient) -> Result<Arc<RuntimeConfig>, ClientError> {
    client.refresh_identity().await;

    let payload = client.get("/api/config").await?;
    let config = serde_json::from_value::<RuntimeConfig>(payload)
        .map_err(|err| ClientError::Decode(err.to_string()))?;

    Ok(client.session().set_runtime_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn anonymous_is_fully_logged_out() {
        let user = CurrentUser::anonymous();
        assert!(!user.is_authenticated);
        assert!(!user.is_admin);
        assert!(!user.is_teaching);
        assert!(user.uid.is_none());
    }

    #[test]
    fn install_profile_maps_payload_wholesale() {
        let session = Session::new();
        let installed = session.install_profile(Ok(json!({
            "isAuthenticated": true,
            "isAdmin": false,
            "isTeaching": true,
            "uid": "300847",
            "name": "Joan Lambert",
            "courses": [{"sectionId": 12345}]
        })));

        assert!(installed.is_authenticated);
        assert!(installed.is_teaching);
        assert!(!installed.is_admin);
        assert_eq!(installed.uid.as_deref(), Some("300847"));
        // Uninterpreted fields ride along in the opaque profile map
        assert!(installed.profile.contains_key("courses"));
    }

    #[test]
    fn install_profile_failure_becomes_anonymous() {
        let session = Session::new();
        session.install_profile(Ok(json!({
            "isAuthenticated": true,
            "isAdmin": true,
            "uid": "300847"
        })));
        assert!(session.current_user().is_authenticated);

        let after = session.install_profile(Err(ClientError::unexpected("connection refused")));
        assert!(!after.is_authenticated);
        assert!(!after.is_admin);
        assert!(session.current_user().uid.is_none());
    }

    #[test]
    fn undecodable_profile_becomes_anonymous() {
        let session = Session::new();
        let installed = session.install_profile(Ok(json!("not an object")));
        assert!(!installed.is_authenticated);
    }

    #[test]
    fn replacement_is_atomic_for_existing_readers() {
        let session = Session::new();
        let before = session.current_user();

        session.install_profile(Ok(json!({"isAuthenticated": true, "uid": "1"})));
        let after = session.current_user();

        // The earlier reader still holds the complete old snapshot
        assert!(!before.is_authenticated);
        assert!(after.is_authenticated);
    }

    #[test]
    fn runtime_config_decodes_camel_case() {
        let config: RuntimeConfig = serde_json::from_value(json!({
            "currentTermId": 2252,
            "currentTermName": "Spring 2025",
            "devAuthEnabled": true,
            "supportEmailAddress": "capture-support@example.edu",
            "timezone": "America/Los_Angeles",
            "searchItemsPerPage": 50
        }))
        .unwrap();

        assert_eq!(config.current_term_id, Some(2252));
        assert_eq!(config.current_term_name.as_deref(), Some("Spring 2025"));
        assert!(config.dev_auth_enabled);
        assert_eq!(config.search_items_per_page, Some(50));
    }
}
