//! Waypoint HTTP client
//!
//! Typed access to the auth and users endpoints of a Waypoint API server.
//! Requests carry a bearer token whenever the configured [`client::TokenSource`]
//! holds one.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, RequestOptions, TokenSource, error::ClientError};
pub use types::{CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest, User};
