//! Session state and the actions that change it

use super::token::TokenStore;
use crate::app::{AppStore, NotificationKind};
use crate::config::AuthConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use waypoint_http::{ApiClient, ClientError, LoginRequest, User};

/// The client's view of who is signed in
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

/// Where the session is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Owns the [`Session`] and the persisted token.
///
/// Overlapping actions are not serialised: whichever finishes last decides
/// the session.
#[derive(Clone, Debug)]
pub struct SessionStore {
    client: ApiClient,
    tokens: TokenStore,
    app: AppStore,
    state: Arc<watch::Sender<Session>>,
    logins_in_flight: Arc<AtomicUsize>,
}

/// Holds the loading indicator for the duration of a login, released on drop
struct LoginInFlight<'a> {
    app: &'a AppStore,
    counter: &'a AtomicUsize,
}

impl<'a> LoginInFlight<'a> {
    fn start(app: &'a AppStore, counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        app.set_loading(true);
        Self { app, counter }
    }
}

impl Drop for LoginInFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
        self.app.set_loading(false);
    }
}

impl SessionStore {
    /// `client` must read its bearer token from `tokens`
    pub fn new(client: ApiClient, tokens: TokenStore, app: AppStore) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            client,
            tokens,
            app,
            state: Arc::new(state),
            logins_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn status(&self) -> SessionStatus {
        if self.logins_in_flight.load(Ordering::SeqCst) > 0 {
            SessionStatus::Authenticating
        } else if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }

    /// Observe session changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Sign in and load the user.
    ///
    /// Shows a success or error notification. The loading indicator is
    /// released however this ends.
    ///
    /// # Errors
    ///
    /// Returns the failing request's error after the error notification has
    /// been shown.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let _in_flight = LoginInFlight::start(&self.app, &self.logins_in_flight);

        match self.authenticate(email, password).await {
            Ok(user) => {
                info!(user_id = user.id, "Logged in");
                self.app.show_notification(
                    AuthConfig::LOGIN_SUCCESS_MESSAGE,
                    NotificationKind::Success,
                );
                Ok(user)
            }
            Err(e) => {
                warn!("Login failed: {e}");
                let message = e
                    .server_message()
                    .unwrap_or(AuthConfig::LOGIN_FAILED_MESSAGE)
                    .to_string();
                self.app.show_notification(message, NotificationKind::Error);
                Err(e)
            }
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.client.login(&credentials).await?;

        let token = response.access_token;

        // Persist first: the user lookup authenticates with the stored token
        self.tokens.set(&token);
        self.state
            .send_modify(|session| session.token = Some(token.clone()));

        match self.client.get_current_user().await {
            Ok(user) => {
                self.set_authenticated(token, user.clone());
                Ok(user)
            }
            Err(e) => {
                self.tokens.remove();
                self.state.send_replace(Session::default());
                Err(e)
            }
        }
    }

    // Token, user and flag are replaced in a single write
    fn set_authenticated(&self, token: String, user: User) {
        self.state.send_replace(Session {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
        });
    }

    /// Forget the session and the persisted token. Never fails.
    pub fn logout(&self) {
        self.tokens.remove();
        self.state.send_replace(Session::default());
        info!("Logged out");
        self.app
            .show_notification(AuthConfig::LOGOUT_MESSAGE, NotificationKind::Info);
    }

    /// Restore the session from a persisted token.
    ///
    /// Without a token nothing happens. A token the server no longer accepts
    /// ends in a full [`logout`](Self::logout); no error is returned.
    pub async fn initialize_auth(&self) {
        let Some(token) = self.tokens.get() else {
            debug!("No persisted token, staying signed out");
            return;
        };

        self.state
            .send_modify(|session| session.token = Some(token.clone()));

        match self.client.get_current_user().await {
            Ok(user) => {
                info!(user_id = user.id, "Session restored");
                self.set_authenticated(token, user);
            }
            Err(e) => {
                error!("Token validation failed: {e}");
                self.logout();
            }
        }
    }

    /// Reload the signed-in user from the server.
    ///
    /// # Errors
    ///
    /// Returns the request error; the session is left as it was.
    pub async fn fetch_current_user(&self) -> Result<User, ClientError> {
        match self.client.get_current_user().await {
            Ok(user) => {
                self.state
                    .send_modify(|session| session.user = Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                error!("Failed to fetch user: {e}");
                Err(e)
            }
        }
    }
}
