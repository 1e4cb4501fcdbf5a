//! Auth page.
//!
//! One surface toggling between sign-in and registration. Sign-in failures
//! stay on the page (the session store logs and absorbs them); registration
//! failures surface so the form can show them.

use std::sync::Arc;

use backend::session::SessionStore;

use crate::error::PageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    Register,
}

/// Controller for the auth route.
pub struct AuthPage {
    session: Arc<SessionStore>,
    mode: AuthMode,
}

impl AuthPage {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            mode: AuthMode::SignIn,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::Register,
            AuthMode::Register => AuthMode::SignIn,
        };
    }

    /// Submit the form in the current mode.
    pub async fn submit(&self, email: &str, password: &str) -> Result<(), PageError> {
        match self.mode {
            AuthMode::SignIn => {
                self.session.sign_in(email, password).await;
                Ok(())
            }
            AuthMode::Register => {
                self.session.sign_up(email, password).await?;
                Ok(())
            }
        }
    }
}
