//! Authentication module

pub mod context;
pub mod guard;
pub mod token;

// Re-export commonly used items
pub use context::{Session, SessionStatus, SessionStore};
pub use guard::{Navigation, Route, RouteGuard};
pub use token::TokenStore;
