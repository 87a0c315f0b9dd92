use std::sync::Arc;

use crate::api::{CarApi, LoginRequest};
use crate::controller::CarListController;
use crate::error::ClientError;
use crate::notify::{NoticeKind, Notifications};
use crate::prompt::Prompter;
use crate::session::CredentialStore;

/// Which view the gate lets through. There is no way back to
/// `Unauthenticated` within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated,
    /// Login form is no longer shown; nothing was sent
    AlreadyAuthenticated,
    /// "Login failed" notification raised; form stays usable
    Failed(ClientError),
}

/// Login form plus the flag that decides between it and the car list
pub struct AuthGate {
    api: Arc<dyn CarApi>,
    credentials: CredentialStore,
    notifications: Notifications,
    state: AuthState,
}

impl AuthGate {
    pub fn new(api: Arc<dyn CarApi>, credentials: CredentialStore, notifications: Notifications) -> Self {
        // A token from earlier in this session still counts
        let state = if credentials.is_empty() {
            AuthState::Unauthenticated
        } else {
            AuthState::Authenticated
        };

        Self {
            api,
            credentials,
            notifications,
            state,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Single attempt, no retry. Only a non-empty token in the response's
    /// `Authorization` header authenticates.
    pub async fn login(&mut self, username: &str, password: &str) -> LoginOutcome {
        if self.is_authenticated() {
            return LoginOutcome::AlreadyAuthenticated;
        }

        let request = LoginRequest::new(username, password);
        match self.api.login(&request).await {
            Ok(credential) => {
                self.credentials.store(credential);
                self.notifications.dismiss(NoticeKind::LoginFailed);
                self.state = AuthState::Authenticated;
                tracing::info!("Authenticated as '{}'", username);
                LoginOutcome::Authenticated
            }
            Err(e) => {
                match &e {
                    ClientError::MissingToken { status } => {
                        tracing::warn!("Login for '{}' refused (HTTP {})", username, status)
                    }
                    other => tracing::error!("Login request failed: {}", other),
                }
                self.notifications.raise(NoticeKind::LoginFailed);
                LoginOutcome::Failed(e)
            }
        }
    }

    /// The car list view. Only available once authenticated.
    pub fn mount(&self, prompter: Arc<dyn Prompter>) -> Option<CarListController> {
        if !self.is_authenticated() {
            return None;
        }

        Some(CarListController::new(
            self.api.clone(),
            self.credentials.clone(),
            prompter,
            self.notifications.clone(),
        ))
    }
}
