// Route table, location state, and the transition loop that applies guard
// decisions before publishing a new location.

pub mod guard;

use std::sync::Arc;

use tokio::sync::watch;
use url::form_urlencoded;

use crate::context::{AppContext, DEFAULT_PAGE_TITLE};
use crate::session::Session;

use guard::{evaluate, landing_redirect, login_redirect, Decision, Guard, NavigationIntent};

pub const LANDING_PATH: &str = "/home";
pub const ADMIN_LANDING_PATH: &str = "/ops";
pub const LOGIN_PATH: &str = "/login";
pub const NOT_FOUND_PATH: &str = "/404";
pub const ERROR_PATH: &str = "/error";

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired";

// A guard chain longer than this is a table bug, not a navigation
const MAX_REDIRECT_HOPS: usize = 8;

/// A resolved point in navigation: path plus decoded query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Parse a target like `/room/42?m=hello` into path and query pairs.
    pub fn parse(target: &str) -> Self {
        let (path, raw_query) = match target.split_once('?') {
            Some((path, raw)) => (path, Some(raw)),
            None => (target, None),
        };
        let path = if path.is_empty() { "/" } else { path };
        let query = raw_query
            .map(|raw| {
                form_urlencoded::parse(raw.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            path: path.to_string(),
            query,
        }
    }

    pub fn with_query(path: &str, params: &[(&str, &str)]) -> Self {
        Self {
            path: path.to_string(),
            query: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// First value for a query key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path plus encoded query string, the form carried in `redirect` params.
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.query {
            serializer.append_pair(k, v);
        }
        format!("{}?{}", self.path, serializer.finish())
    }
}

/// Whether a view route carries one of the special per-route rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Plain,
    /// Applies the inverse rule: authenticated visitors are sent away
    Login,
    /// The default landing page; admins who teach nothing are rerouted
    Landing,
}

#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub pattern: &'static str,
    pub title: Option<&'static str>,
    pub guard: Guard,
    pub kind: RouteKind,
}

#[derive(Debug, Clone)]
pub enum RouteEntry {
    View(RouteSpec),
    Redirect {
        pattern: &'static str,
        to: &'static str,
    },
}

/// Captured `:param` segments from a matched pattern.
pub type RouteParams = Vec<(String, String)>;

/// Match a `:param`-style pattern against a concrete path. `*` matches
/// anything (the catch-all entry).
pub fn match_pattern(pattern: &str, path: &str) -> Option<RouteParams> {
    if pattern == "*" {
        return Some(Vec::new());
    }
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }
    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_string(), (*actual).to_string()));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

/// Declarative route table: each entry declares its access policy at
/// construction time; nothing is mutated at runtime.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    pub fn find(&self, path: &str) -> Option<(&RouteEntry, RouteParams)> {
        for entry in &self.entries {
            let pattern = match entry {
                RouteEntry::View(spec) => spec.pattern,
                RouteEntry::Redirect { pattern, .. } => pattern,
            };
            if let Some(params) = match_pattern(pattern, path) {
                return Some((entry, params));
            }
        }
        None
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let view = |pattern, title, guard, kind| {
            RouteEntry::View(RouteSpec {
                pattern,
                title,
                guard,
                kind,
            })
        };
        Self::new(vec![
            RouteEntry::Redirect {
                pattern: "/",
                to: LANDING_PATH,
            },
            view(LOGIN_PATH, Some("Welcome"), Guard::None, RouteKind::Login),
            view(
                LANDING_PATH,
                Some("Home"),
                Guard::Instructor,
                RouteKind::Landing,
            ),
            view(
                "/approve/:term_id/:section_id",
                None,
                Guard::Instructor,
                RouteKind::Plain,
            ),
            view(
                "/changes",
                Some("Course Changes"),
                Guard::Admin,
                RouteKind::Plain,
            ),
            view("/jobs", Some("Jobs"), Guard::Admin, RouteKind::Plain),
            view(
                ADMIN_LANDING_PATH,
                Some("Operations"),
                Guard::Admin,
                RouteKind::Plain,
            ),
            view("/room/:id", Some("Room"), Guard::Admin, RouteKind::Plain),
            view("/rooms", Some("Rooms"), Guard::Admin, RouteKind::Plain),
            view(
                "/templates",
                Some("Email Templates"),
                Guard::Admin,
                RouteKind::Plain,
            ),
            view("/user/:uid", Some("User"), Guard::Admin, RouteKind::Plain),
            view(
                NOT_FOUND_PATH,
                Some("Page not found"),
                Guard::None,
                RouteKind::Plain,
            ),
            view(ERROR_PATH, Some("Error"), Guard::None, RouteKind::Plain),
            RouteEntry::Redirect {
                pattern: "*",
                to: NOT_FOUND_PATH,
            },
        ])
    }
}

/// Navigation state machine.
///
/// `push` resolves a target through the guard chain synchronously against
/// the current identity snapshot, then publishes the final location on a
/// watch channel for the shell to render.
pub struct Router {
    table: RouteTable,
    session: Arc<Session>,
    context: Arc<AppContext>,
    current: watch::Sender<Location>,
}

impl Router {
    pub fn new(session: Arc<Session>, context: Arc<AppContext>) -> Arc<Self> {
        Self::with_table(RouteTable::default(), session, context)
    }

    pub fn with_table(
        table: RouteTable,
        session: Arc<Session>,
        context: Arc<AppContext>,
    ) -> Arc<Self> {
        let (current, _) = watch::channel(Location::parse("/"));
        Arc::new(Self {
            table,
            session,
            context,
            current,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.current.subscribe()
    }

    pub fn current_location(&self) -> Location {
        self.current.borrow().clone()
    }

    /// Navigate to a target (path with optional query string).
    pub fn push(&self, target: &str) -> Location {
        self.navigate(Location::parse(target))
    }

    /// Navigate with explicit query parameters.
    pub fn push_with_query(&self, path: &str, params: &[(&str, &str)]) -> Location {
        self.navigate(Location::with_query(path, params))
    }

    /// Unexpected runtime fault: log it and land on the generic error view.
    pub fn report_fault(&self, message: &str) -> Location {
        tracing::error!("unexpected fault: {message}");
        self.push_with_query(ERROR_PATH, &[("m", message)])
    }

    fn navigate(&self, target: Location) -> Location {
        let (location, matched) = self.resolve(target);
        let title = matched
            .and_then(|spec| spec.title)
            .unwrap_or(DEFAULT_PAGE_TITLE);
        self.context.set_document_title(title);
        self.current.send_replace(location.clone());
        location
    }

    /// Walk the guard chain to a terminal location.
    fn resolve(&self, target: Location) -> (Location, Option<&RouteSpec>) {
        let mut location = target;
        for _ in 0..MAX_REDIRECT_HOPS {
            let Some((entry, _params)) = self.table.find(&location.path) else {
                location = Location::parse(NOT_FOUND_PATH);
                continue;
            };
            let spec = match entry {
                RouteEntry::Redirect { to, .. } => {
                    // Query params survive table-level redirects
                    location = Location {
                        path: (*to).to_string(),
                        query: location.query,
                    };
                    continue;
                }
                RouteEntry::View(spec) => spec,
            };

            let user = self.session.current_user();
            let intent = NavigationIntent {
                full_path: location.full_path(),
                is_landing: spec.kind == RouteKind::Landing,
                error: location.query_value("error").map(str::to_string),
            };

            match evaluate(spec.guard, &user, &intent) {
                Decision::Proceed => {
                    if spec.kind == RouteKind::Login {
                        if let Some(target) =
                            login_redirect(&user, location.query_value("redirect"))
                        {
                            location = Location::parse(&target);
                            continue;
                        }
                    }
                    if spec.kind == RouteKind::Landing {
                        if let Some(path) = landing_redirect(&user) {
                            location = Location::parse(path);
                            continue;
                        }
                    }
                    return (location, Some(spec));
                }
                Decision::RedirectToLogin { redirect, error } => {
                    let mut query = Vec::new();
                    if let Some(error) = error {
                        query.push(("error".to_string(), error));
                    }
                    if let Some(redirect) = redirect {
                        query.push(("redirect".to_string(), redirect));
                    }
                    location = Location {
                        path: LOGIN_PATH.to_string(),
                        query,
                    };
                    continue;
                }
                Decision::RedirectToForbidden => {
                    // The admin surface is not revealed to non-admins
                    location = Location::parse(NOT_FOUND_PATH);
                    continue;
                }
                Decision::Redirect(path) => {
                    location = Location::parse(&path);
                    continue;
                }
            }
        }
        tracing::warn!("redirect chain exceeded {MAX_REDIRECT_HOPS} hops, landing on not-found");
        (Location::parse(NOT_FOUND_PATH), None)
    }
}
