//! Application wiring with an explicit init/teardown contract.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use backend::repositories::{
    ExpenseRepository, OrganizationRepository, PlanRepository, ProfileRepository,
};
use backend::{AuthApi, AuthClient, RestClient, SessionState, SessionStore};
use feed::{EventSource, FeedClient};

use crate::config::Config;
use crate::pages::{AuthPage, CreatePlanPage, EditPlanPage, EventPage, EventsPage};

/// Owns the clients, the session store, and the cancellation root.
///
/// Construction spawns the background tasks; [`AppContext::shutdown`]
/// cancels them. Pages are built on demand and borrow nothing from the
/// context, so they outlive navigation freely.
pub struct AppContext {
    config: Config,
    feed: Arc<FeedClient>,
    rest: Arc<RestClient>,
    auth: Arc<AuthClient>,
    session: Arc<SessionStore>,
    cancel: CancellationToken,
}

impl AppContext {
    /// Wire config → clients → session store and start the background
    /// tasks: the session-token forwarder and the session store's stream
    /// consumer.
    pub fn new(config: Config) -> Self {
        let cancel = CancellationToken::new();

        let feed = Arc::new(FeedClient::new(config.feed.default_url.clone()));
        let rest = Arc::new(RestClient::new(
            config.backend.url.clone(),
            config.backend.anon_key.clone(),
        ));
        let auth = Arc::new(AuthClient::new(
            config.backend.url.clone(),
            config.backend.anon_key.clone(),
        ));

        // Forward every session change to the row client so row-level
        // security applies to the signed-in member.
        let token_rest = rest.clone();
        let mut sessions = auth.subscribe();
        let token_cancel = cancel.child_token();
        tokio::spawn(async move {
            loop {
                let token = sessions
                    .borrow_and_update()
                    .as_ref()
                    .map(|session| session.access_token.clone());
                if token_cancel.is_cancelled() {
                    break;
                }
                token_rest.set_access_token(token).await;
                tokio::select! {
                    _ = token_cancel.cancelled() => break,
                    changed = sessions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let session = SessionStore::spawn(
            auth.clone() as Arc<dyn AuthApi>,
            ProfileRepository::new(rest.clone()),
            cancel.child_token(),
        );

        info!(backend = %config.backend.url, "application context started");
        Self {
            config,
            feed,
            rest,
            auth,
            session,
            cancel,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seed a cached session, as a persisted login would on startup.
    pub fn restore_session(&self, session: backend::Session) {
        self.auth.restore(session);
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The current session snapshot.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn events_page(&self) -> EventsPage {
        EventsPage::new(self.feed.clone() as Arc<dyn EventSource>)
    }

    pub fn event_page(&self) -> EventPage {
        EventPage::new(self.feed.clone() as Arc<dyn EventSource>)
    }

    pub fn create_plan_page(&self, event_id: impl Into<String>) -> CreatePlanPage {
        CreatePlanPage::new(
            event_id.into(),
            self.feed.clone() as Arc<dyn EventSource>,
            PlanRepository::new(self.rest.clone()),
            OrganizationRepository::new(self.rest.clone()),
            ExpenseRepository::new(self.rest.clone()),
            self.cancel.child_token(),
        )
    }

    pub fn edit_plan_page(&self, event_id: impl Into<String>) -> EditPlanPage {
        EditPlanPage::new(
            event_id.into(),
            self.feed.clone() as Arc<dyn EventSource>,
            PlanRepository::new(self.rest.clone()),
            OrganizationRepository::new(self.rest.clone()),
            ExpenseRepository::new(self.rest.clone()),
            self.cancel.child_token(),
        )
    }

    pub fn auth_page(&self) -> AuthPage {
        AuthPage::new(self.session.clone())
    }

    /// Stop the background tasks. Pages already built keep working for
    /// reads, but cancelled loads and saves no longer mutate state.
    pub fn shutdown(&self) {
        info!("application context shutting down");
        self.cancel.cancel();
    }
}
