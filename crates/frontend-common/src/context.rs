//! Application context wiring the stores together

use crate::app::AppStore;
use crate::auth::{Navigation, Route, RouteGuard, SessionStore, TokenStore};
use crate::config::RuntimeConfig;
use crate::storage::TokenStorage;
use std::sync::Arc;
use tracing::debug;
use waypoint_http::{ApiClient, ClientError};

/// Everything a frontend needs, built once at startup and passed around
#[derive(Clone, Debug)]
pub struct AppContext {
    config: RuntimeConfig,
    client: ApiClient,
    app: AppStore,
    session: SessionStore,
    guard: RouteGuard,
}

impl AppContext {
    /// Build the context on top of the given client storage
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub fn new(config: RuntimeConfig, storage: Arc<dyn TokenStorage>) -> Result<Self, ClientError> {
        let tokens = TokenStore::new(storage);

        let mut builder = ApiClient::builder()
            .base_url(config.api_base.clone())
            .token_source(Arc::new(tokens.clone()));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let app = AppStore::new();
        let session = SessionStore::new(client.clone(), tokens, app.clone());

        Ok(Self {
            config,
            client,
            app,
            session,
            guard: RouteGuard::default(),
        })
    }

    /// Replace the default route guard policy
    #[must_use]
    pub fn with_guard(mut self, guard: RouteGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Restore a persisted session, if there is one
    pub async fn start(&self) {
        debug!(app = %self.config.app_name, api_base = %self.config.api_base, "Starting");
        self.session.initialize_auth().await;
    }

    /// Run the route guard for `target` against the current session
    pub fn navigate(&self, target: &str) -> Navigation {
        let route = Route::parse(target);
        let decision = self.guard.check(&self.session.session(), &route);
        debug!(%route, ?decision, "Navigation checked");
        decision
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn app(&self) -> &AppStore {
        &self.app
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }
}
