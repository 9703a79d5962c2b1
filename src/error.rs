// Admin client error types
use serde_json::{json, Value};
use thiserror::Error;

/// Failure of any admin client operation, carrying an operator-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    // No token held locally
    #[error("{0}")]
    Unauthenticated(String),

    // 401 / 403 from the backend
    #[error("{message}")]
    AuthorizationRejected { status: u16, message: String },

    // Rejected before any network call
    #[error("{0}")]
    Validation(String),

    // Any other non-success response
    #[error("{message}")]
    Remote { status: u16, message: String },

    // Network unreachable, timeout, undecodable body
    #[error("{0}")]
    Transport(String),
}

impl AdminError {
    /// HTTP status behind the error, if the backend answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AdminError::AuthorizationRejected { status, .. } => Some(*status),
            AdminError::Remote { status, .. } => Some(*status),
            AdminError::Unauthenticated(_)
            | AdminError::Validation(_)
            | AdminError::Transport(_) => None,
        }
    }

    /// Operator-facing message
    pub fn message(&self) -> &str {
        match self {
            AdminError::Unauthenticated(msg) => msg,
            AdminError::AuthorizationRejected { message, .. } => message,
            AdminError::Validation(msg) => msg,
            AdminError::Remote { message, .. } => message,
            AdminError::Transport(msg) => msg,
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Unauthenticated(_) => "UNAUTHENTICATED",
            AdminError::AuthorizationRejected { .. } => "AUTHORIZATION_REJECTED",
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::Remote { .. } => "REMOTE_ERROR",
            AdminError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Errors that must de-authenticate the session
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AdminError::Unauthenticated(_) | AdminError::AuthorizationRejected { .. }
        )
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "error_code": self.error_code(),
        });
        if let Some(status) = self.status_code() {
            body["status"] = json!(status);
        }
        body
    }
}

impl AdminError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        AdminError::Unauthenticated(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        AdminError::Transport(message.into())
    }

    /// Classify a non-success status: auth statuses end the session, the rest stay local
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => AdminError::AuthorizationRejected {
                status,
                message: message.into(),
            },
            _ => AdminError::Remote {
                status,
                message: message.into(),
            },
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(error: reqwest::Error) -> Self {
        AdminError::Transport(error.to_string())
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
