use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{AdminApi, Credentials, LOGIN_FAILED};
use crate::config::{ApiConfig, ConfigError};
use crate::error::{AdminError, AdminResult};
use crate::model::user::WireAccount;
use crate::model::{AccountId, UserAccount, UserPatch};
use crate::session::Session;
use crate::types::{MutationKind, ResourceKind};

const DETAIL_FAILED: &str = "Ошибка при получении информации о пользователе";

/// reqwest-backed [`AdminApi`]. Reads the bearer token from the session on every call.
#[derive(Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: String,
    session: Session,
    log_requests: bool,
}

impl std::fmt::Debug for HttpAdminApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdminApi")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl HttpAdminApi {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ConfigError> {
        let base_url = config.parsed_base_url()?;
        let base_url = base_url.as_str().trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        info!("Admin API client targeting {}", base_url);

        Ok(Self {
            client,
            base_url,
            session,
            log_requests: false,
        })
    }

    /// Log the status of every response at debug level
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the session token, or fail without touching the network
    fn authorized(&self, builder: RequestBuilder) -> AdminResult<RequestBuilder> {
        match self.session.token() {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Err(AdminError::unauthenticated("Требуется вход в систему")),
        }
    }

    /// Send and turn any non-success status into a domain error
    async fn execute(&self, request: RequestBuilder, fallback: &str) -> AdminResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("Admin API transport failure: {}", e);
            AdminError::transport(format!("{}: {}", fallback, e))
        })?;

        let status = response.status();
        if self.log_requests {
            debug!("{} -> {}", response.url().path(), status);
        }
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body).unwrap_or_else(|| fallback.to_string());
        warn!("Admin API returned {}: {}", status, message);
        Err(AdminError::from_status(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> AdminResult<T> {
        response.json::<T>().await.map_err(|e| {
            warn!("Undecodable admin API payload: {}", e);
            AdminError::transport(format!("{}: {}", fallback, e))
        })
    }

    async fn mutate(&self, request: RequestBuilder, kind: MutationKind) -> AdminResult<()> {
        let request = self.authorized(request)?;
        self.execute(request, kind.error_message()).await?;
        Ok(())
    }
}

/// Prefer `{"message": ...}` bodies, then any non-empty plain text
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
    }
    Some(trimmed.to_string())
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn authenticate(&self, credentials: &Credentials) -> AdminResult<String> {
        info!("Logging in as '{}'", credentials.login);
        let request = self
            .client
            .post(self.url("/api/admin/login"))
            .json(credentials);

        let response = match self.execute(request, LOGIN_FAILED).await {
            Ok(response) => response,
            // Any rejection reads the same to the operator
            Err(e @ AdminError::Transport(_)) => return Err(e),
            Err(e) => {
                return Err(AdminError::from_status(
                    e.status_code().unwrap_or(401),
                    LOGIN_FAILED,
                ))
            }
        };

        let token = response.text().await?.trim().to_string();
        if token.is_empty() {
            return Err(AdminError::transport("Пустой токен в ответе сервера"));
        }
        Ok(token)
    }

    async fn validate_token(&self, token: &str) -> AdminResult<bool> {
        let response = self
            .client
            .post(self.url("/api/admin/check-token"))
            .json(&json!({ "token": token }))
            .send()
            .await?;

        let valid = response.status().is_success();
        debug!("Token check returned {}", response.status());
        Ok(valid)
    }

    async fn list_collection(&self, kind: ResourceKind) -> AdminResult<Vec<UserAccount>> {
        let request = self.authorized(self.client.get(self.url(kind.list_path())))?;
        let response = self.execute(request, kind.list_error()).await?;
        let wire: Vec<WireAccount> = Self::decode(response, kind.list_error()).await?;

        let accounts = wire
            .into_iter()
            .map(|w| UserAccount::from_wire(w, kind.implied_role()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdminError::transport(format!("{}: {}", kind.list_error(), e)))?;

        debug!("Fetched {} {}", accounts.len(), kind.label());
        Ok(accounts)
    }

    async fn get_detail(&self, kind: ResourceKind, id: AccountId) -> AdminResult<UserAccount> {
        let request = self.authorized(self.client.get(self.url(&kind.detail_path(id))))?;
        let response = self.execute(request, DETAIL_FAILED).await?;
        let wire: WireAccount = Self::decode(response, DETAIL_FAILED).await?;
        UserAccount::from_wire(wire, kind.implied_role())
            .map_err(|e| AdminError::transport(format!("{}: {}", DETAIL_FAILED, e)))
    }

    async fn activate(&self, kind: ResourceKind, id: AccountId) -> AdminResult<()> {
        info!("Activating account {} ({})", id, kind.label());
        let request = self.client.put(self.url(&kind.activate_path(id)));
        self.mutate(request, MutationKind::Activate).await
    }

    async fn deactivate(&self, id: AccountId) -> AdminResult<()> {
        info!("Deactivating account {}", id);
        let request = self
            .client
            .put(self.url(&format!("/api/admin/users/{}/deactivate", id)));
        self.mutate(request, MutationKind::Deactivate).await
    }

    async fn update(&self, id: AccountId, patch: &UserPatch) -> AdminResult<()> {
        info!("Updating account {}", id);
        let request = self
            .client
            .put(self.url(&format!("/api/admin/users/{}", id)))
            .json(patch);
        self.mutate(request, MutationKind::Update).await
    }

    async fn remove(&self, id: AccountId) -> AdminResult<()> {
        info!("Deleting account {}", id);
        let request = self
            .client
            .delete(self.url(&format!("/api/admin/users/{}", id)));
        self.mutate(request, MutationKind::Delete).await
    }
}
