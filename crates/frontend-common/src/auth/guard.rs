//! Authentication route guard
//!
//! Decides, for every navigation, whether the target may be shown with the
//! current session or where to send the user instead. The guard has no side
//! effects; callers perform the redirect.

use super::Session;
use crate::config::AuthConfig;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::fmt;

/// Characters escaped when a path is carried in a query value
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// A navigation target split into its parts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Route {
    /// Parse a full path such as `/users?page=2#top`
    pub fn parse(full_path: &str) -> Self {
        let (rest, fragment) = match full_path.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (full_path, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            path: path.to_string(),
            query,
            fragment,
        }
    }

    /// Path including query and fragment
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if let Some(query) = &self.query {
            full.push('?');
            full.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            full.push('#');
            full.push_str(fragment);
        }
        full
    }

    /// Decoded value of the first query parameter called `key`
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode_str(name).decode_utf8_lossy() == key)
                .then(|| percent_decode_str(value).decode_utf8_lossy().into_owned())
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

/// Outcome of a guard check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(String),
}

/// Route guard policy
#[derive(Clone, Debug)]
pub struct RouteGuard {
    login_path: String,
    home_path: String,
    public_routes: Vec<String>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            login_path: AuthConfig::LOGIN_PATH.to_string(),
            home_path: AuthConfig::HOME_PATH.to_string(),
            public_routes: vec![AuthConfig::LOGIN_PATH.to_string()],
        }
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different login screen. It is always a public route.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.public_routes.retain(|route| *route != self.login_path);
        self.public_routes.push(path.clone());
        self.login_path = path;
        self
    }

    #[must_use]
    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }

    /// Add a route that is reachable without a session
    #[must_use]
    pub fn with_public_route(mut self, path: impl Into<String>) -> Self {
        self.public_routes.push(path.into());
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.iter().any(|route| route == path)
    }

    /// Decide whether `target` may be shown for `session`
    pub fn check(&self, session: &Session, target: &Route) -> Navigation {
        if self.is_public(&target.path) {
            if session.is_authenticated {
                return Navigation::Redirect(self.home_path.clone());
            }
            return Navigation::Allow;
        }

        if !session.is_authenticated {
            return Navigation::Redirect(self.login_redirect(target));
        }

        Navigation::Allow
    }

    /// Login route remembering `target` for after sign-in
    pub fn login_redirect(&self, target: &Route) -> String {
        format!(
            "{}?{}={}",
            self.login_path,
            AuthConfig::REDIRECT_QUERY_KEY,
            utf8_percent_encode(&target.full_path(), QUERY_VALUE)
        )
    }

    /// Where to go once a login from `login_route` succeeds.
    ///
    /// Only local absolute paths are honoured; anything else lands on home.
    pub fn post_login_target(&self, login_route: &Route) -> String {
        login_route
            .query_param(AuthConfig::REDIRECT_QUERY_KEY)
            .filter(|target| target.starts_with('/') && !target.starts_with("//"))
            .unwrap_or_else(|| self.home_path.clone())
    }
}
