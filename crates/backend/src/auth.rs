//! Authentication client and session change stream.
//!
//! State always flows through the change stream: a successful sign-in
//! publishes the new session on the watch channel instead of returning it,
//! so consumers can never observe a "signed out" state right after a
//! successful credential check.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use crate::error::BackendError;

/// The authenticated member, as the auth service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: AuthUser,
}

/// Contract for the hosted authentication service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Check credentials. On success the new session arrives via the change
    /// stream, not the return value.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), BackendError>;

    /// Register a new member, returning the created user. Errors propagate.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    /// Clear the session. Backend failures are logged, never surfaced.
    async fn sign_out(&self);

    /// The current session, if any.
    fn current(&self) -> Option<Session>;

    /// Subscribe to the session change stream. The receiver yields the
    /// current session on every change.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

// Declared response schemas. Anything else is a Schema error.

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    // Auto-confirm deployments answer with a full session; confirm-by-email
    // deployments answer with the bare user object.
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    email: Option<String>,
}

/// GoTrue-style client for password auth.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    sessions: watch::Sender<Option<Session>>,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let (sessions, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            sessions,
        }
    }

    /// Seed a previously cached session, publishing it on the stream.
    pub fn restore(&self, session: Session) {
        self.sessions.send_replace(Some(session));
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn password_grant(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Schema(err.to_string()))?;
        Ok(Session {
            access_token: token.access_token,
            user: token.user,
        })
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let session = self.password_grant(email, password).await?;
        self.sessions.send_replace(Some(session));
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }

        let body: SignUpResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Schema(err.to_string()))?;

        let user = match (body.user, body.id, body.email) {
            (Some(user), _, _) => user,
            (None, Some(id), Some(email)) => AuthUser { id, email },
            _ => {
                return Err(BackendError::Schema(
                    "sign-up response carried no user".to_string(),
                ))
            }
        };

        if let Some(access_token) = body.access_token {
            self.sessions.send_replace(Some(Session {
                access_token,
                user: user.clone(),
            }));
        }

        Ok(user)
    }

    async fn sign_out(&self) {
        // Clear local state first; the member is signed out regardless of
        // whether the backend call below succeeds.
        let previous = self.sessions.send_replace(None);

        if let Some(session) = previous {
            let result = self
                .http
                .post(self.auth_url("logout"))
                .header("apikey", &self.api_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "sign-out rejected by backend");
                }
                Err(err) => warn!(error = %err, "sign-out request failed"),
                Ok(_) => {}
            }
        }
    }

    fn current(&self) -> Option<Session> {
        self.sessions.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}
