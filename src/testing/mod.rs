use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::{AdminApi, Credentials, LOGIN_FAILED};
use crate::error::{AdminError, AdminResult};
use crate::model::{AccountId, AccountProfile, Role, StaffProfile, StudentProfile, UserAccount, UserPatch};
use crate::types::ResourceKind;

/// In-memory backend that records every call it receives
#[derive(Default)]
pub struct FakeAdminApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    accounts: Vec<(UserAccount, bool)>,
    valid_tokens: HashSet<String>,
    admin: Option<(String, String)>,
    calls: Vec<String>,
    // (call prefix, error); no prefix fails whatever comes next
    fail_next: Option<(Option<String>, AdminError)>,
    unreachable: bool,
}

pub fn teacher(id: AccountId, first: &str) -> UserAccount {
    UserAccount {
        id,
        first_name: first.to_string(),
        phone: None,
        telegram_id: None,
        profile: AccountProfile::Teacher(StaffProfile::default()),
    }
}

pub fn deanery(id: AccountId, first: &str) -> UserAccount {
    UserAccount {
        profile: AccountProfile::Deanery(StaffProfile::default()),
        ..teacher(id, first)
    }
}

pub fn student(id: AccountId, first: &str) -> UserAccount {
    UserAccount {
        profile: AccountProfile::Student(StudentProfile::default()),
        ..teacher(id, first)
    }
}

impl FakeAdminApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_admin(self, login: &str, password: &str) -> Self {
        self.state().admin = Some((login.to_string(), password.to_string()));
        self
    }

    pub fn with_token(self, token: &str) -> Self {
        self.state().valid_tokens.insert(token.to_string());
        self
    }

    pub fn with_inactive(self, account: UserAccount) -> Self {
        self.state().accounts.push((account, false));
        self
    }

    pub fn with_active(self, account: UserAccount) -> Self {
        self.state().accounts.push((account, true));
        self
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: AdminError) {
        self.state().fail_next = Some((None, error));
    }

    /// Make the next call whose name starts with `prefix` fail with `error`
    pub fn fail_next_matching(&self, prefix: &str, error: AdminError) {
        self.state().fail_next = Some((Some(prefix.to_string()), error));
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Record the call and apply any injected failure
    fn enter(&self, call: String) -> AdminResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        if state.unreachable {
            state.calls.push(call);
            return Err(AdminError::transport("connection refused"));
        }
        let fails = match &state.fail_next {
            Some((Some(prefix), _)) => call.starts_with(prefix.as_str()),
            Some((None, _)) => true,
            None => false,
        };
        state.calls.push(call);
        if fails {
            if let Some((_, error)) = state.fail_next.take() {
                return Err(error);
            }
        }
        Ok(state)
    }
}

fn not_found(id: AccountId) -> AdminError {
    AdminError::from_status(404, format!("Пользователь {} не найден", id))
}

fn position(state: &FakeState, id: AccountId) -> AdminResult<usize> {
    state
        .accounts
        .iter()
        .position(|(a, _)| a.id == id)
        .ok_or_else(|| not_found(id))
}

#[async_trait]
impl AdminApi for FakeAdminApi {
    async fn authenticate(&self, credentials: &Credentials) -> AdminResult<String> {
        let mut state = self.enter(format!("authenticate {}", credentials.login))?;
        let accepted = matches!(
            &state.admin,
            Some((login, password)) if *login == credentials.login && *password == credentials.password
        );
        if !accepted {
            return Err(AdminError::from_status(401, LOGIN_FAILED));
        }
        let token = format!("token-{}", state.calls.len());
        state.valid_tokens.insert(token.clone());
        Ok(token)
    }

    async fn validate_token(&self, token: &str) -> AdminResult<bool> {
        let state = self.enter("validate_token".to_string())?;
        Ok(state.valid_tokens.contains(token))
    }

    async fn list_collection(&self, kind: ResourceKind) -> AdminResult<Vec<UserAccount>> {
        let state = self.enter(format!("list {:?}", kind))?;
        let accounts = state
            .accounts
            .iter()
            .filter(|(account, active)| match kind {
                ResourceKind::InactiveTeachers => !active && account.role() == Role::Teacher,
                ResourceKind::InactiveDeanery => !active && account.role() == Role::Deanery,
                ResourceKind::ActiveUsers => *active,
                ResourceKind::InactiveUsers => !active,
            })
            .map(|(account, _)| account.clone())
            .collect();
        Ok(accounts)
    }

    async fn get_detail(&self, kind: ResourceKind, id: AccountId) -> AdminResult<UserAccount> {
        let state = self.enter(format!("detail {:?} {}", kind, id))?;
        let index = position(&state, id)?;
        Ok(state.accounts[index].0.clone())
    }

    async fn activate(&self, kind: ResourceKind, id: AccountId) -> AdminResult<()> {
        let mut state = self.enter(format!("activate {:?} {}", kind, id))?;
        let index = position(&state, id)?;
        state.accounts[index].1 = true;
        Ok(())
    }

    async fn deactivate(&self, id: AccountId) -> AdminResult<()> {
        let mut state = self.enter(format!("deactivate {}", id))?;
        let index = position(&state, id)?;
        state.accounts[index].1 = false;
        Ok(())
    }

    async fn update(&self, id: AccountId, patch: &UserPatch) -> AdminResult<()> {
        let mut state = self.enter(format!("update {}", id))?;
        let index = position(&state, id)?;
        let account = &mut state.accounts[index].0;
        if let Some(first) = &patch.first_name {
            account.first_name = first.clone();
        }
        if let Some(last) = &patch.last_name {
            match &mut account.profile {
                AccountProfile::Teacher(staff) | AccountProfile::Deanery(staff) => {
                    staff.last_name = Some(last.clone())
                }
                AccountProfile::Student(student) => student.last_name = Some(last.clone()),
            }
        }
        Ok(())
    }

    async fn remove(&self, id: AccountId) -> AdminResult<()> {
        let mut state = self.enter(format!("remove {}", id))?;
        let index = position(&state, id)?;
        state.accounts.remove(index);
        Ok(())
    }
}
