//! Detail panel for one selected account.
//!
//! Edits go into a draft that is only sent on save and thrown away on cancel.
//! Deletion needs an explicit confirmation step. Any successful mutation closes the
//! panel; a failed one keeps it open with the error and the draft intact.

use tracing::debug;

use crate::controller::ResourceController;
use crate::error::{AdminError, AdminResult};
use crate::model::{UserAccount, UserPatch};
use crate::types::Mutation;

#[derive(Debug, Default)]
pub struct DetailPanel {
    selected: Option<UserAccount>,
    draft: Option<UserPatch>,
    delete_requested: bool,
    error: Option<AdminError>,
}

impl DetailPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `account`, dropping any state left from a previous selection
    pub fn open(&mut self, account: UserAccount) {
        debug!("Opening account {}", account.id);
        *self = Self {
            selected: Some(account),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&UserAccount> {
        self.selected.as_ref()
    }

    /// Inline error from the last failed action
    pub fn error(&self) -> Option<&AdminError> {
        self.error.as_ref()
    }

    /// Deactivation is never offered for students
    pub fn can_deactivate(&self) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|a| a.role().can_deactivate())
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&UserPatch> {
        self.draft.as_ref()
    }

    /// Start editing from the selected account's current names
    pub fn begin_edit(&mut self) -> AdminResult<&mut UserPatch> {
        let account = self.require_selected()?;
        let draft = UserPatch {
            first_name: Some(account.first_name.clone()),
            last_name: account.last_name().map(str::to_string),
        };
        Ok(self.draft.insert(draft))
    }

    pub fn draft_mut(&mut self) -> Option<&mut UserPatch> {
        self.draft.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    pub async fn save(&mut self, controller: &mut ResourceController) -> AdminResult<()> {
        let patch = self
            .draft
            .clone()
            .ok_or_else(|| AdminError::validation("Редактирование не начато"))?;
        self.run(controller, Mutation::Update(patch)).await
    }

    pub async fn activate(&mut self, controller: &mut ResourceController) -> AdminResult<()> {
        self.run(controller, Mutation::Activate).await
    }

    pub async fn deactivate(&mut self, controller: &mut ResourceController) -> AdminResult<()> {
        self.run(controller, Mutation::Deactivate).await
    }

    /// First step of deletion. Returns the question to put to the operator.
    pub fn request_delete(&mut self) -> AdminResult<String> {
        let account = self.require_selected()?;
        let name = format!(
            "{} {}",
            account.first_name,
            account.last_name().unwrap_or_default()
        );
        let prompt = format!("Вы уверены, что хотите удалить {}?", name.trim_end());
        self.delete_requested = true;
        Ok(prompt)
    }

    pub fn cancel_delete(&mut self) {
        self.delete_requested = false;
    }

    pub fn is_delete_requested(&self) -> bool {
        self.delete_requested
    }

    /// Second step of deletion; fails without a prior [`request_delete`](Self::request_delete)
    pub async fn confirm_delete(&mut self, controller: &mut ResourceController) -> AdminResult<()> {
        if !self.delete_requested {
            return Err(AdminError::validation("Удаление не подтверждено"));
        }
        self.delete_requested = false;
        self.run(controller, Mutation::Delete).await
    }

    async fn run(&mut self, controller: &mut ResourceController, mutation: Mutation) -> AdminResult<()> {
        let id = self.require_selected()?.id;
        match controller.mutate(mutation, id).await {
            Ok(()) => {
                self.close();
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn require_selected(&self) -> AdminResult<&UserAccount> {
        self.selected
            .as_ref()
            .ok_or_else(|| AdminError::validation("Пользователь не выбран"))
    }
}
