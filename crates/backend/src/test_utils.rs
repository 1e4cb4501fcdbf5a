//! Shared test fakes for the backend contracts.
//!
//! `MemoryStore` is an in-memory [`RowStore`] with operation recording and
//! failure injection; `MockAuth` drives the session change stream without a
//! network. Both are used by this crate's tests and by the app crate's
//! controller tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use crate::auth::{AuthApi, AuthUser, Session};
use crate::error::BackendError;
use crate::store::{Filter, RowStore};

/// One recorded store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Select(String),
    Insert(String),
    Update(String, i64),
    Delete(String, i64),
}

/// In-memory row store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicI64,
    ops: Mutex<Vec<Operation>>,
    fail_deletes: AtomicBool,
    fail_updates: AtomicBool,
    fail_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    /// Replace a table's rows.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
    }

    /// Current rows of a table.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Mutating operations recorded so far (selects are not recorded).
    pub fn operations(&self) -> Vec<Operation> {
        self.ops.lock().unwrap().clone()
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::Relaxed);
    }

    pub fn allow_deletes(&self) {
        self.fail_deletes.store(false, Ordering::Relaxed);
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::Relaxed);
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::Relaxed);
    }

    fn injected_failure(op: &str) -> BackendError {
        BackendError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("injected {} failure", op),
        }
    }

    fn record(&self, op: Operation) {
        self.ops.lock().unwrap().push(op);
    }
}

fn value_matches(field: Option<&Value>, wanted: &str) -> bool {
    match field {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Number(n)) => n.to_string() == wanted,
        Some(Value::Bool(b)) => b.to_string() == wanted,
        _ => false,
    }
}

fn row_id(row: &Value) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        _columns: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| {
                filters
                    .iter()
                    .all(|filter| value_matches(row.get(&filter.column), &filter.value))
            })
            .collect();
        if let Some(column) = order {
            rows.sort_by_key(|row| row.get(column).and_then(Value::as_i64).unwrap_or(i64::MAX));
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError> {
        self.record(Operation::Insert(table.to_string()));
        if self.fail_inserts.load(Ordering::Relaxed) {
            return Err(Self::injected_failure("insert"));
        }

        let mut stored = row;
        if stored.get("id").is_none() {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            stored["id"] = Value::from(id);
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, table: &str, id: i64, patch: Value) -> Result<Value, BackendError> {
        self.record(Operation::Update(table.to_string(), id));
        if self.fail_updates.load(Ordering::Relaxed) {
            return Err(Self::injected_failure("update"));
        }

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let row = rows
            .iter_mut()
            .find(|row| row_id(row) == Some(id))
            .ok_or(BackendError::NotFound)?;
        if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: i64) -> Result<(), BackendError> {
        self.record(Operation::Delete(table.to_string(), id));
        if self.fail_deletes.load(Ordering::Relaxed) {
            return Err(Self::injected_failure("delete"));
        }

        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| row_id(row) != Some(id));
        }
        Ok(())
    }
}

/// Scripted auth service driving the session change stream.
pub struct MockAuth {
    user_id: Uuid,
    sessions: watch::Sender<Option<Session>>,
    fail_sign_in: AtomicBool,
    fail_sign_up: AtomicBool,
}

impl MockAuth {
    /// A mock whose successful sign-ins and sign-ups authenticate the given
    /// user id.
    pub fn with_user(user_id: Uuid) -> Self {
        let (sessions, _) = watch::channel(None);
        Self {
            user_id,
            sessions,
            fail_sign_in: AtomicBool::new(false),
            fail_sign_up: AtomicBool::new(false),
        }
    }

    pub fn fail_sign_in(&self) {
        self.fail_sign_in.store(true, Ordering::Relaxed);
    }

    pub fn fail_sign_up(&self) {
        self.fail_sign_up.store(true, Ordering::Relaxed);
    }

    /// Publish a session directly, as a restored cache would.
    pub fn push_session(&self, session: Option<Session>) {
        self.sessions.send_replace(session);
    }

    fn session_for(&self, email: &str) -> Session {
        Session {
            access_token: "test-token".to_string(),
            user: AuthUser {
                id: self.user_id,
                email: email.to_string(),
            },
        }
    }
}

#[async_trait]
impl AuthApi for MockAuth {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<(), BackendError> {
        if self.fail_sign_in.load(Ordering::Relaxed) {
            return Err(BackendError::Api {
                status: reqwest::StatusCode::UNAUTHORIZED,
                message: "invalid credentials".to_string(),
            });
        }
        self.sessions.send_replace(Some(self.session_for(email)));
        Ok(())
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthUser, BackendError> {
        if self.fail_sign_up.load(Ordering::Relaxed) {
            return Err(BackendError::Api {
                status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
                message: "email already registered".to_string(),
            });
        }
        let session = self.session_for(email);
        let user = session.user.clone();
        self.sessions.send_replace(Some(session));
        Ok(user)
    }

    async fn sign_out(&self) {
        self.sessions.send_replace(None);
    }

    fn current(&self) -> Option<Session> {
        self.sessions.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}
