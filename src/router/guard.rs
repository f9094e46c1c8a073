// Route access policy and the pure decision function evaluated before
// every page transition.

use serde::{Deserialize, Serialize};

use crate::session::CurrentUser;

use super::{ADMIN_LANDING_PATH, LANDING_PATH};

/// Access policy a route declares at table-construction time.
///
/// A closed set evaluated by one shared function; routes never attach
/// arbitrary guard callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    None,
    Authenticated,
    Instructor,
    Admin,
}

/// One attempted transition, resolved once per navigation.
#[derive(Debug, Clone)]
pub struct NavigationIntent {
    /// Target path including its query string, carried into login redirects
    pub full_path: String,
    /// Whether the target is the default landing page
    pub is_landing: bool,
    /// Upstream `error` query value, forwarded to the login view
    pub error: Option<String>,
}

/// Outcome of guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    RedirectToLogin {
        redirect: Option<String>,
        error: Option<String>,
    },
    RedirectToForbidden,
    Redirect(String),
}

/// Decide whether a transition may proceed. Pure and synchronous; reads
/// nothing but its arguments.
pub fn evaluate(guard: Guard, user: &CurrentUser, intent: &NavigationIntent) -> Decision {
    match guard {
        Guard::None => Decision::Proceed,
        Guard::Authenticated => {
            if user.is_authenticated {
                Decision::Proceed
            } else {
                to_login(intent)
            }
        }
        Guard::Instructor => {
            if user.is_teaching || user.is_admin {
                Decision::Proceed
            } else {
                to_login(intent)
            }
        }
        Guard::Admin => {
            if user.is_admin {
                Decision::Proceed
            } else if user.is_authenticated {
                Decision::RedirectToForbidden
            } else {
                to_login(intent)
            }
        }
    }
}

/// Secondary rule for the instructor landing page: an admin with no
/// sections of their own gets the admin landing view instead.
pub fn landing_redirect(user: &CurrentUser) -> Option<&'static str> {
    (user.is_admin && !user.is_teaching).then_some(ADMIN_LANDING_PATH)
}

/// Inverse rule for the login view: an authenticated visitor is sent to the
/// carried `redirect` target, or the landing page when the value is absent
/// or blank.
pub fn login_redirect(user: &CurrentUser, redirect_query: Option<&str>) -> Option<String> {
    if !user.is_authenticated {
        return None;
    }
    match redirect_query.map(str::trim).filter(|s| !s.is_empty()) {
        Some(target) => Some(target.to_string()),
        None => Some(LANDING_PATH.to_string()),
    }
}

fn to_login(intent: &NavigationIntent) -> Decision {
    Decision::RedirectToLogin {
        // The landing page is where login lands by default; carrying it
        // would only build a redirect loop back to itself
        redirect: (!intent.is_landing).then(|| intent.full_path.clone()),
        error: intent.error.clone(),
    }
}
