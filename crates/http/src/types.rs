//! Wire types shared by the client and its consumers

use serde::{Deserialize, Serialize};

/// A user account as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Creation timestamp, kept in the server's string form
    pub created_at: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,
}

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Update user request. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_uses_camel_case_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "email": "a@b.com",
            "name": null,
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name, None);
        assert_eq!(user.created_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let request = UpdateUserRequest {
            name: Some("Ada".to_string()),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "name": "Ada" }));
    }

    #[test]
    fn test_login_response_reads_access_token() {
        let response: LoginResponse =
            serde_json::from_value(json!({ "accessToken": "T" })).unwrap();
        assert_eq!(response.access_token, "T");
    }
}
