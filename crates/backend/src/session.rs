//! Session store.
//!
//! Tracks `{ user, profile, loading }` and keeps them consistent with the
//! auth service's change stream: each stream event atomically replaces the
//! identity, and every identity change refetches the profile keyed by the
//! new user id (clearing it when the identity is absent).

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::error;

use domain::models::{default_username, Profile};

use crate::auth::{AuthApi, AuthUser, Session};
use crate::error::BackendError;
use crate::repositories::ProfileRepository;

/// Snapshot of the authenticated state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub profile: Option<Profile>,
    /// True until the first change-stream event has been applied.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            loading: true,
        }
    }
}

/// Owns the subscription to the auth change stream and publishes
/// [`SessionState`] snapshots on its own watch channel.
pub struct SessionStore {
    auth: Arc<dyn AuthApi>,
    profiles: ProfileRepository,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Spawn the store's background task. The task seeds from whatever
    /// session the auth client currently holds, then applies every change
    /// until `cancel` fires; after that no state mutation happens, even for
    /// a profile fetch already in flight.
    pub fn spawn(
        auth: Arc<dyn AuthApi>,
        profiles: ProfileRepository,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::default());
        let store = Arc::new(Self {
            auth,
            profiles,
            state,
        });

        let task_store = store.clone();
        tokio::spawn(async move {
            let mut sessions = task_store.auth.subscribe();
            loop {
                let session = sessions.borrow_and_update().clone();
                let next = tokio::select! {
                    _ = cancel.cancelled() => break,
                    next = task_store.next_state(session) => next,
                };
                // The fetch may have raced the token; re-check before
                // publishing.
                if cancel.is_cancelled() {
                    break;
                }
                task_store.state.send_replace(next);
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = sessions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        store
    }

    async fn next_state(&self, session: Option<Session>) -> SessionState {
        match session {
            Some(session) => {
                let profile = match self.profiles.fetch(session.user.id).await {
                    Ok(profile) => profile,
                    Err(err) => {
                        error!(error = %err, user = %session.user.id, "failed to fetch profile");
                        None
                    }
                };
                SessionState {
                    user: Some(session.user),
                    profile,
                    loading: false,
                }
            }
            None => SessionState {
                user: None,
                profile: None,
                loading: false,
            },
        }
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The current snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Check credentials. Failures are logged and absorbed; the state keeps
    /// reflecting the unauthenticated condition.
    pub async fn sign_in(&self, email: &str, password: &str) {
        if let Err(err) = self.auth.sign_in(email, password).await {
            error!(error = %err, "sign-in failed");
        }
    }

    /// Register a member and provision their profile row, named after the
    /// local part of the email. Failures surface to the caller.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let user = self.auth.sign_up(email, password).await?;
        self.profiles
            .create(user.id, &default_username(email))
            .await?;
        Ok(())
    }

    /// Clear identity, profile, and session. Never fails.
    pub async fn sign_out(&self) {
        self.auth.sign_out().await;
    }
}
