pub mod app;
pub mod auth;
pub mod config;
pub mod context;
pub mod storage;

pub use app::{AppStore, Notification, NotificationKind};
pub use auth::{
    Navigation, Route, RouteGuard, Session, SessionStatus, SessionStore, TokenStore,
};
pub use config::{AuthConfig, RuntimeConfig};
pub use context::AppContext;
pub use storage::{MemoryStorage, NoopStorage, TokenStorage};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
