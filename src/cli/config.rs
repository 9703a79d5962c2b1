use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{AdminApi, HttpAdminApi};
use crate::config;
use crate::controller::ResourceController;
use crate::guard::RouteGuard;
use crate::session::{FileTokenStorage, Session};
use crate::types::ResourceKind;

const SESSION_FILE: &str = "session.json";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("CONSULT_ADMIN_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("consult-admin")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn session_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join(SESSION_FILE))
}

/// Session persisted in the CLI config directory
pub fn open_session() -> anyhow::Result<Session> {
    let storage = FileTokenStorage::new(session_file()?);
    Ok(Session::open(storage)?)
}

/// Everything a command needs: one session and one gateway sharing it
#[derive(Clone)]
pub struct AdminContext {
    pub session: Session,
    pub api: Arc<dyn AdminApi>,
}

impl AdminContext {
    pub fn new(api: Arc<dyn AdminApi>, session: Session) -> Self {
        Self { session, api }
    }

    pub fn from_config() -> anyhow::Result<Self> {
        let config = config::config();
        let session = open_session()?;
        let api = HttpAdminApi::new(&config.api, session.clone())?
            .with_request_logging(config.logging.log_requests);
        Ok(Self::new(Arc::new(api), session))
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(Arc::clone(&self.api), self.session.clone())
    }

    pub fn controller(&self, kind: ResourceKind) -> ResourceController {
        ResourceController::new(Arc::clone(&self.api), self.session.clone(), kind)
    }
}
