//! Generic fetch / mutate / reload state machine over one resource collection.
//!
//! The loaded collection is never patched in place. A successful mutation is always
//! followed by a reload of the same kind, because activation or deactivation can move
//! an account out of the collection entirely:
//!
//! ```text
//! Idle ──load──▶ Loading ──▶ Ready | Failed
//! Ready ──mutate──▶ Mutating ──ok──▶ Reloading ──▶ Ready | Failed
//!                            └─err─▶ Ready (collection untouched)
//! ```

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::AdminApi;
use crate::error::{AdminError, AdminResult};
use crate::filter::{self, FilterCriteria};
use crate::model::{AccountId, Role, UserAccount};
use crate::session::Session;
use crate::types::{Mutation, MutationKind, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Mutating(MutationKind),
    Reloading,
    Ready,
    Failed(AdminError),
}

/// Coarse view of [`Phase`] for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Error,
    Ready,
}

/// Identifies one issued load; only the latest ticket may apply its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

pub struct ResourceController {
    api: Arc<dyn AdminApi>,
    session: Session,
    kind: ResourceKind,
    items: Vec<UserAccount>,
    phase: Phase,
    generation: u64,
}

impl std::fmt::Debug for ResourceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceController")
            .field("kind", &self.kind)
            .field("items", &self.items.len())
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .finish()
    }
}

impl ResourceController {
    pub fn new(api: Arc<dyn AdminApi>, session: Session, kind: ResourceKind) -> Self {
        Self {
            api,
            session,
            kind,
            items: Vec::new(),
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn items(&self) -> &[UserAccount] {
        &self.items
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn status(&self) -> LoadStatus {
        match self.phase {
            Phase::Ready => LoadStatus::Ready,
            Phase::Failed(_) => LoadStatus::Error,
            Phase::Idle | Phase::Loading | Phase::Mutating(_) | Phase::Reloading => {
                LoadStatus::Loading
            }
        }
    }

    pub fn error(&self) -> Option<&AdminError> {
        match &self.phase {
            Phase::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn find(&self, id: AccountId) -> Option<&UserAccount> {
        self.items.iter().find(|a| a.id == id)
    }

    /// Filtered view of the current collection
    pub fn visible(&self, criteria: &FilterCriteria) -> Vec<&UserAccount> {
        filter::project(&self.items, criteria)
    }

    /// Issue a new load ticket, superseding every earlier one
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = match self.phase {
            Phase::Mutating(_) => Phase::Reloading,
            _ => Phase::Loading,
        };
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Fetch of this controller's collection, detached from `self` so message-driven
    /// callers can run it elsewhere and hand the result to [`apply_load`](Self::apply_load)
    pub fn fetch(&self) -> impl Future<Output = AdminResult<Vec<UserAccount>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        let kind = self.kind;
        async move { api.list_collection(kind).await }
    }

    /// Apply a fetched response. Responses for superseded tickets are dropped and
    /// `false` is returned.
    pub fn apply_load(&mut self, ticket: LoadTicket, result: AdminResult<Vec<UserAccount>>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale {} response (ticket {}, latest {})",
                self.kind.label(),
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(items) => {
                debug!("Loaded {} {}", items.len(), self.kind.label());
                self.items = items;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                warn!("Loading {} failed: {}", self.kind.label(), e);
                self.session.invalidate_on(&e);
                self.phase = Phase::Failed(e);
            }
        }
        true
    }

    /// Fetch and replace the collection
    pub async fn load(&mut self) -> AdminResult<()> {
        let ticket = self.begin_load();
        let result = self.fetch().await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.apply_load(ticket, result);
        outcome
    }

    /// Fetch one account through this collection's endpoint group
    pub async fn detail(&self, id: AccountId) -> AdminResult<UserAccount> {
        self.api.get_detail(self.kind, id).await.inspect_err(|e| {
            self.session.invalidate_on(e);
        })
    }

    /// Run `mutation` against account `id`, then reload the collection.
    ///
    /// Returns the mutation's own result. A failed reload after a successful mutation
    /// is reported through [`status`](Self::status), not as a mutation error.
    pub async fn mutate(&mut self, mutation: Mutation, id: AccountId) -> AdminResult<()> {
        self.check_allowed(&mutation, id)?;

        let op = mutation.kind();
        let restore = std::mem::replace(&mut self.phase, Phase::Mutating(op));

        let result = match mutation {
            Mutation::Activate => self.api.activate(self.kind, id).await,
            Mutation::Deactivate => self.api.deactivate(id).await,
            Mutation::Update(patch) => self.api.update(id, &patch).await,
            Mutation::Delete => self.api.remove(id).await,
        };

        if let Err(e) = result {
            warn!("{} of account {} failed: {}", op.as_str(), id, e);
            self.session.invalidate_on(&e);
            self.phase = restore;
            return Err(e);
        }

        info!("{} of account {} succeeded, reloading {}", op.as_str(), id, self.kind.label());
        let _ = self.load().await;
        Ok(())
    }

    /// Local policy checks; nothing here touches the network
    fn check_allowed(&self, mutation: &Mutation, id: AccountId) -> AdminResult<()> {
        let op = mutation.kind();
        if !self.kind.supports(op) {
            return Err(AdminError::validation(format!(
                "Операция '{}' недоступна для списка: {}",
                op.as_str(),
                self.kind.label()
            )));
        }

        let target = self.find(id).ok_or_else(|| {
            AdminError::validation(format!("Пользователь {} не найден в загруженном списке", id))
        })?;

        match mutation {
            Mutation::Deactivate if !target.role().can_deactivate() => {
                Err(AdminError::validation(format!(
                    "Нельзя деактивировать пользователя с ролью {}",
                    Role::Student
                )))
            }
            Mutation::Update(patch) if patch.is_empty() => {
                Err(AdminError::validation("Нет изменений для сохранения"))
            }
            _ => Ok(()),
        }
    }
}
