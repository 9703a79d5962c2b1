//! Typed gateway to the consultation bot's admin REST surface.
//!
//! [`AdminApi`] is the seam the guard, controller and panel are written against;
//! [`HttpAdminApi`] is the reqwest implementation. Implementations translate every
//! non-success response into an [`AdminError`](crate::error::AdminError) and never
//! touch the session or any cached collection.

pub mod client;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AdminResult;
use crate::model::{AccountId, UserAccount, UserPatch};
use crate::types::ResourceKind;

pub use client::HttpAdminApi;

/// Message shown for any failed login, whatever the server said
pub const LOGIN_FAILED: &str = "Неверный логин или пароль";

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Exchange credentials for an opaque bearer token
    async fn authenticate(&self, credentials: &Credentials) -> AdminResult<String>;

    /// Ask the backend whether `token` is still accepted. Rejection is `Ok(false)`;
    /// only transport problems are errors.
    async fn validate_token(&self, token: &str) -> AdminResult<bool>;

    async fn list_collection(&self, kind: ResourceKind) -> AdminResult<Vec<UserAccount>>;

    async fn get_detail(&self, kind: ResourceKind, id: AccountId) -> AdminResult<UserAccount>;

    async fn activate(&self, kind: ResourceKind, id: AccountId) -> AdminResult<()>;

    async fn deactivate(&self, id: AccountId) -> AdminResult<()>;

    async fn update(&self, id: AccountId, patch: &UserPatch) -> AdminResult<()>;

    async fn remove(&self, id: AccountId) -> AdminResult<()>;
}
