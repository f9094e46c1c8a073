// Client-side error taxonomy for remote API calls
use reqwest::StatusCode;
use thiserror::Error;

/// Error raised by the API client, classified by how the shell must react.
///
/// Every failed call resolves to exactly one of these; the interceptor may
/// add a navigation side effect but always hands the original error back to
/// the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// 401 - no valid session
    #[error("{0}")]
    Unauthenticated(String),

    /// 403 - session exists but lacks the required role
    #[error("{0}")]
    Forbidden(String),

    /// 404 - missing resource
    #[error("{0}")]
    NotFound(String),

    /// Any other 4xx/5xx carrying a server-supplied message
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Network/transport failure before any status code existed
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response arrived but its payload was not the expected JSON
    #[error("invalid response payload: {0}")]
    Decode(String),

    /// Caught at top level and routed to the generic error view
    #[error("{0}")]
    Unexpected(String),
}

impl ClientError {
    /// HTTP status code, when one was observed
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthenticated(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            ClientError::Decode(_) | ClientError::Unexpected(_) => None,
        }
    }

    /// Human-readable message, suitable for the error view or inline display
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthenticated(msg)
            | ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::Decode(msg)
            | ClientError::Unexpected(msg) => msg.clone(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Transport(err) => err.to_string(),
        }
    }

    /// True for the two statuses that mean the session must be re-established
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated(_) | ClientError::Forbidden(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Classify a non-success response status plus its server message
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthenticated(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ClientError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ClientError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ClientError::NotFound(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        ClientError::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auth_statuses() {
        let unauthenticated = ClientError::from_status(StatusCode::UNAUTHORIZED, "no session");
        assert!(unauthenticated.is_auth_failure());
        assert_eq!(unauthenticated.status(), Some(401));

        let forbidden = ClientError::from_status(StatusCode::FORBIDDEN, "admins only");
        assert!(forbidden.is_auth_failure());
        assert_eq!(forbidden.status(), Some(403));
    }

    #[test]
    fn classifies_not_found_and_server_errors() {
        let missing = ClientError::from_status(StatusCode::NOT_FOUND, "no such room");
        assert!(missing.is_not_found());
        assert!(!missing.is_auth_failure());

        let server = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(!server.is_auth_failure());
        assert_eq!(server.status(), Some(500));
        assert_eq!(server.message(), "boom");
    }
}
