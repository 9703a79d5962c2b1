#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use consult_admin::api::HttpAdminApi;
use consult_admin::cli::AdminContext;
use consult_admin::config::ApiConfig;
use consult_admin::session::Session;

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pass";

#[derive(Debug, Clone)]
pub struct MockAccount {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub role: &'static str,
    pub phone: Option<String>,
    pub telegram_id: Option<i64>,
    pub active: bool,
}

impl MockAccount {
    fn to_json(&self, with_role: bool) -> Value {
        let mut value = json!({
            "id": self.id,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "phone": self.phone,
            "telegramId": self.telegram_id,
        });
        if self.role != "STUDENT" {
            value["email"] = json!(format!("user{}@uni.example", self.id));
        }
        if with_role {
            value["role"] = json!(self.role);
        }
        value
    }
}

fn account(
    id: i64,
    first: &str,
    last: Option<&str>,
    role: &'static str,
    phone: Option<&str>,
    telegram_id: Option<i64>,
    active: bool,
) -> MockAccount {
    MockAccount {
        id,
        first_name: first.to_string(),
        last_name: last.map(str::to_string),
        role,
        phone: phone.map(str::to_string),
        telegram_id,
        active,
    }
}

/// Accounts every backend starts with
pub fn fixture() -> Vec<MockAccount> {
    vec![
        account(1, "Anna", Some("Ivanova"), "TEACHER", None, Some(1001), false),
        account(2, "Boris", Some("Petrov"), "DEANERY", Some("+7 900 222"), None, false),
        account(3, "Olga", Some("Smirnova"), "TEACHER", Some("+7 900 123"), Some(1003), true),
        account(4, "Ivan", Some("Sidorov"), "STUDENT", None, Some(1004), true),
        account(5, "Maria", None, "STUDENT", None, Some(1005), false),
        account(6, "Pavel", Some("Orlov"), "DEANERY", None, None, true),
    ]
}

#[derive(Default)]
struct MockState {
    accounts: Vec<MockAccount>,
    tokens: HashSet<String>,
    issued: usize,
    requests: Vec<String>,
    fail_next: Option<(StatusCode, String)>,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap()
}

/// In-process stand-in for the consultation bot's admin REST API
pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn spawn() -> Result<Self> {
        let state: Shared = Arc::new(Mutex::new(MockState {
            accounts: fixture(),
            ..Default::default()
        }));

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    /// Token the backend accepts, as if issued by an earlier login
    pub fn issue_token(&self) -> String {
        let mut state = lock(&self.state);
        state.issued += 1;
        let token = format!("mock-token-{}", state.issued);
        state.tokens.insert(token.clone());
        token
    }

    pub fn revoke_all(&self) {
        lock(&self.state).tokens.clear();
    }

    /// Make the next authorized request fail with `status` and raw `body`
    pub fn fail_next(&self, status: StatusCode, body: &str) {
        lock(&self.state).fail_next = Some((status, body.to_string()));
    }

    /// "METHOD /path" of every request received so far
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.state).requests.clear();
    }

    pub fn account(&self, id: i64) -> Option<MockAccount> {
        lock(&self.state).accounts.iter().find(|a| a.id == id).cloned()
    }

    /// Context whose gateway talks to this backend, sharing `session`
    pub fn context(&self, session: Session) -> Result<AdminContext> {
        let api = HttpAdminApi::new(&ApiConfig::with_base_url(&self.base_url), session.clone())?;
        Ok(AdminContext::new(Arc::new(api), session))
    }

    /// Context with a fresh in-memory session holding a valid token
    pub fn logged_in(&self) -> Result<AdminContext> {
        let session = Session::in_memory();
        session.set_token(self.issue_token())?;
        self.context(session)
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/check-token", post(check_token))
        .route("/api/admin/unactive-accounts", get(list_pending_teachers))
        .route("/api/admin/unactive-deanery-accounts", get(list_pending_deanery))
        .route("/api/admin/users/active", get(list_active))
        .route("/api/admin/users/inactive", get(list_inactive))
        .route("/api/admin/user-info/:id", get(detail))
        .route("/api/admin/deanery-user-info/:id", get(detail))
        .route("/api/admin/activate-account/:id", put(activate))
        .route("/api/admin/activate-deanery-account/:id", put(activate))
        .route("/api/admin/users/:id/activate", put(activate))
        .route("/api/admin/users/:id/deactivate", put(deactivate))
        .route("/api/admin/users/:id", get(detail).put(update).delete(remove))
        .with_state(state)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// Record the request and check the bearer token
fn enter(state: &Shared, method: Method, uri: &Uri, headers: &HeaderMap) -> Result<(), Response> {
    let mut state = lock(state);
    state.requests.push(format!("{} {}", method, uri.path()));

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        Some(token) if state.tokens.contains(token) => {}
        _ => return Err(message(StatusCode::UNAUTHORIZED, "Unauthorized")),
    }

    if let Some((status, body)) = state.fail_next.take() {
        return Err((status, body).into_response());
    }
    Ok(())
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    state.requests.push("POST /api/admin/login".to_string());

    if body["login"] != ADMIN_LOGIN || body["password"] != ADMIN_PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Bad credentials");
    }
    state.issued += 1;
    let token = format!("mock-token-{}", state.issued);
    state.tokens.insert(token.clone());
    token.into_response()
}

async fn check_token(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    state.requests.push("POST /api/admin/check-token".to_string());

    let valid = body["token"]
        .as_str()
        .is_some_and(|t| state.tokens.contains(t));
    if valid {
        StatusCode::OK.into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

fn list_where(
    state: &Shared,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    with_role: bool,
    keep: impl Fn(&MockAccount) -> bool,
) -> Response {
    if let Err(rejected) = enter(state, method, &uri, &headers) {
        return rejected;
    }
    let items: Vec<Value> = lock(state)
        .accounts
        .iter()
        .filter(|a| keep(*a))
        .map(|a| a.to_json(with_role))
        .collect();
    Json(items).into_response()
}

// Role-scoped pages omit the role field like the real backend's DTOs
async fn list_pending_teachers(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    list_where(&state, method, uri, headers, false, |a| !a.active && a.role == "TEACHER")
}

async fn list_pending_deanery(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    list_where(&state, method, uri, headers, false, |a| !a.active && a.role == "DEANERY")
}

async fn list_active(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    list_where(&state, method, uri, headers, true, |a| a.active)
}

async fn list_inactive(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    list_where(&state, method, uri, headers, true, |a| !a.active)
}

async fn detail(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = enter(&state, method, &uri, &headers) {
        return rejected;
    }
    let state = lock(&state);
    match state.accounts.iter().find(|a| a.id == id) {
        Some(account) => Json(account.to_json(true)).into_response(),
        None => message(StatusCode::NOT_FOUND, &format!("Пользователь с id {} не найден", id)),
    }
}

fn with_account(state: &Shared, id: i64, change: impl FnOnce(&mut MockAccount)) -> Response {
    let mut state = lock(state);
    match state.accounts.iter_mut().find(|a| a.id == id) {
        Some(account) => {
            change(account);
            StatusCode::OK.into_response()
        }
        None => message(StatusCode::NOT_FOUND, &format!("Пользователь с id {} не найден", id)),
    }
}

async fn activate(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = enter(&state, method, &uri, &headers) {
        return rejected;
    }
    with_account(&state, id, |a| a.active = true)
}

async fn deactivate(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = enter(&state, method, &uri, &headers) {
        return rejected;
    }
    with_account(&state, id, |a| a.active = false)
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(patch): Json<Value>,
) -> Response {
    if let Err(rejected) = enter(&state, method, &uri, &headers) {
        return rejected;
    }
    let first = patch["firstName"].as_str().map(str::to_string);
    let last = patch["lastName"].as_str().map(str::to_string);
    with_account(&state, id, |a| {
        if let Some(first) = first {
            a.first_name = first;
        }
        if let Some(last) = last {
            a.last_name = Some(last);
        }
    })
}

async fn remove(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = enter(&state, method, &uri, &headers) {
        return rejected;
    }
    let mut state = lock(&state);
    let before = state.accounts.len();
    state.accounts.retain(|a| a.id != id);
    if state.accounts.len() == before {
        return message(StatusCode::NOT_FOUND, &format!("Пользователь с id {} не найден", id));
    }
    StatusCode::OK.into_response()
}
