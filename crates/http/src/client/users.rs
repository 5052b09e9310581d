//! User management client methods

use super::{ApiClient, ClientError, RequestOptions};
use crate::types::{CreateUserRequest, UpdateUserRequest, User};
use reqwest::Method;
use serde::de::IgnoredAny;

impl ApiClient {
    /// List all users
    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        self.request("/users/", RequestOptions::new()).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<User, ClientError> {
        self.request(&format!("/users/{id}"), RequestOptions::new()).await
    }

    /// Create a user
    pub async fn create_user(&self, user: &CreateUserRequest) -> Result<User, ClientError> {
        self.request(
            "/users/",
            RequestOptions::new().method(Method::POST).body(user),
        )
        .await
    }

    /// Update a user. Only the fields that are set are sent.
    pub async fn update_user(
        &self,
        id: i64,
        changes: &UpdateUserRequest,
    ) -> Result<User, ClientError> {
        self.request(
            &format!("/users/{id}"),
            RequestOptions::new().method(Method::PUT).body(changes),
        )
        .await
    }

    /// Delete a user. Whatever the server answers with is discarded.
    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        let _: IgnoredAny = self
            .request(
                &format!("/users/{id}"),
                RequestOptions::new().method(Method::DELETE),
            )
            .await?;
        Ok(())
    }
}
