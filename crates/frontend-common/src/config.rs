//! Frontend configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Storage key the bearer token is persisted under
    pub const AUTH_TOKEN_KEY: &'static str = "auth_token";

    /// Route of the login screen
    pub const LOGIN_PATH: &'static str = "/login";

    /// Route authenticated users are sent to from public routes
    pub const HOME_PATH: &'static str = "/";

    /// Query parameter carrying the originally requested path
    pub const REDIRECT_QUERY_KEY: &'static str = "redirect";

    pub const LOGIN_SUCCESS_MESSAGE: &'static str = "Logged in";
    pub const LOGIN_FAILED_MESSAGE: &'static str = "Login failed";
    pub const LOGOUT_MESSAGE: &'static str = "Logged out";
}

/// Runtime configuration supplied by the build or the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Base URL every API path is appended to
    pub api_base: String,

    /// Display name of the application
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Request timeout in seconds; unset leaves the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_app_name() -> String {
    "Waypoint".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080".to_string(),
            app_name: default_app_name(),
            timeout_secs: None,
        }
    }
}

impl RuntimeConfig {
    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
