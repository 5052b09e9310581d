//! Application-wide UI state: the loading indicator and the active notification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// Transient feedback shown to the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Notification {
    pub show: bool,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// Loading flag and single-slot notification.
///
/// Handles are cheap to clone and share the same state. A new notification
/// replaces the previous one; nothing is queued.
#[derive(Clone, Debug)]
pub struct AppStore {
    loading: Arc<watch::Sender<bool>>,
    notification: Arc<watch::Sender<Notification>>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    pub fn new() -> Self {
        let (loading, _) = watch::channel(false);
        let (notification, _) = watch::channel(Notification::default());
        Self {
            loading: Arc::new(loading),
            notification: Arc::new(notification),
        }
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn set_loading(&self, value: bool) {
        self.loading.send_replace(value);
    }

    /// Current notification
    pub fn notification(&self) -> Notification {
        self.notification.borrow().clone()
    }

    /// Show a notification, replacing whatever was shown before
    pub fn show_notification(&self, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        debug!(%kind, %message, "Showing notification");
        self.notification.send_replace(Notification {
            show: true,
            message,
            kind,
        });
    }

    /// Hide the notification, keeping its last message and kind
    pub fn hide_notification(&self) {
        self.notification.send_modify(|notification| notification.show = false);
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Notification> {
        self.notification.subscribe()
    }
}
