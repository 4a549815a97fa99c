//! Explicitly passed flow context: the current auth snapshot and a sink for
//! transient user notifications.

use std::sync::Mutex;

use crate::auth_gate::AuthSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Receives the transient notifications (toasts) raised by the flows.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, title: &str, message: &str);
}

/// Everything a flow needs from its surroundings.
#[derive(Clone, Copy)]
pub struct FlowContext<'a> {
    pub auth: &'a AuthSnapshot,
    pub notifier: &'a dyn Notifier,
}

impl<'a> FlowContext<'a> {
    pub fn new(auth: &'a AuthSnapshot, notifier: &'a dyn Notifier) -> Self {
        Self { auth, notifier }
    }

    pub(crate) fn success(&self, title: &str, message: &str) {
        self.notifier.notify(NoticeKind::Success, title, message);
    }

    pub(crate) fn error(&self, title: &str, message: &str) {
        self.notifier.notify(NoticeKind::Error, title, message);
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, title: &str, message: &str) {
        match kind {
            NoticeKind::Success => tracing::info!(title, message, "Notification"),
            NoticeKind::Error => tracing::warn!(title, message, "Error notification"),
        }
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

/// Keeps every notification in memory, in the order raised.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, title: &str, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notice {
                kind,
                title: title.to_string(),
                message: message.to_string(),
            });
    }
}
