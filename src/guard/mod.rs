//! Admission check run before any protected view or command.
//!
//! Presence of a stored token is not enough: it is validated against the backend on
//! every entry. Rejection, or failure to reach the backend, clears the session.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::AdminApi;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum DenyReason {
    NoToken,
    Rejected,
    Unreachable(String),
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::NoToken => f.write_str("Требуется вход в систему"),
            DenyReason::Rejected => f.write_str("Сессия истекла, войдите снова"),
            DenyReason::Unreachable(detail) => {
                write!(f, "Не удалось проверить сессию: {}", detail)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    Checking,
    Admitted,
    Denied(DenyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Admit,
    RedirectToLogin(DenyReason),
}

pub struct RouteGuard {
    api: Arc<dyn AdminApi>,
    session: Session,
    state: watch::Sender<GuardState>,
}

impl RouteGuard {
    pub fn new(api: Arc<dyn AdminApi>, session: Session) -> Self {
        let (state, _) = watch::channel(GuardState::Unchecked);
        Self { api, session, state }
    }

    pub fn state(&self) -> GuardState {
        self.state.borrow().clone()
    }

    /// Observe state transitions; a view renders nothing protected until `Admitted`
    pub fn subscribe(&self) -> watch::Receiver<GuardState> {
        self.state.subscribe()
    }

    /// Decide admission for one entry into a protected area.
    ///
    /// Issues at most one validation request, and none when no token is held.
    pub async fn enter(&self) -> Decision {
        self.state.send_replace(GuardState::Unchecked);

        let Some(token) = self.session.token() else {
            debug!("No stored token, redirecting to login");
            return self.deny(DenyReason::NoToken);
        };

        self.state.send_replace(GuardState::Checking);
        let reason = match self.api.validate_token(&token).await {
            Ok(true) => {
                debug!("Token accepted");
                self.state.send_replace(GuardState::Admitted);
                return Decision::Admit;
            }
            Ok(false) => DenyReason::Rejected,
            Err(e) => DenyReason::Unreachable(e.message().to_string()),
        };

        warn!("Session check failed: {}", reason);
        if let Err(e) = self.session.clear() {
            warn!("Failed to clear stored token: {}", e);
        }
        self.deny(reason)
    }

    fn deny(&self, reason: DenyReason) -> Decision {
        self.state.send_replace(GuardState::Denied(reason.clone()));
        Decision::RedirectToLogin(reason)
    }
}
