use tracing::info;

use crate::api::{AdminApi, Credentials};
use crate::error::AdminError;
use crate::session::storage::StorageError;
use crate::session::Session;

#[derive(Debug)]
pub enum AuthError {
    Api(AdminError),
    Storage(StorageError),
}

impl AuthError {
    /// The gateway error behind a failed login, if that is what failed
    pub fn api_error(&self) -> Option<&AdminError> {
        match self {
            AuthError::Api(e) => Some(e),
            AuthError::Storage(_) => None,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Api(e) => write!(f, "{}", e),
            AuthError::Storage(e) => write!(f, "Token storage error: {}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Api(e) => Some(e),
            AuthError::Storage(e) => Some(e),
        }
    }
}

impl From<AdminError> for AuthError {
    fn from(e: AdminError) -> Self {
        AuthError::Api(e)
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Storage(e)
    }
}

/// Exchange credentials for a token and store it.
///
/// Any previously held token is dropped first, so a failed attempt always leaves the
/// session empty.
pub async fn login(
    api: &dyn AdminApi,
    session: &Session,
    credentials: &Credentials,
) -> Result<String, AuthError> {
    session.clear()?;
    let token = api.authenticate(credentials).await?;
    session.set_token(token.clone())?;
    info!("Logged in as {}", credentials.login);
    Ok(token)
}

pub fn logout(session: &Session) -> Result<(), AuthError> {
    session.clear()?;
    info!("Logged out");
    Ok(())
}
