//! Authentication API client methods

use super::{ApiClient, ClientError, RequestOptions};
use crate::types::{LoginRequest, LoginResponse, User};
use reqwest::Method;

impl ApiClient {
    /// Exchange credentials for an access token
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.request(
            "/auth/login",
            RequestOptions::new().method(Method::POST).body(credentials),
        )
        .await
    }

    /// Get the user the current token belongs to
    pub async fn get_current_user(&self) -> Result<User, ClientError> {
        self.request("/users/me", RequestOptions::new()).await
    }
}
