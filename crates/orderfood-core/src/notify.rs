//! Transient notifications ("toasts").
//!
//! Operations report outcomes through a [`Notifier`]; the UI drains the
//! matching receiver into a [`ToastQueue`] and shows the newest live toast.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;
use tracing::debug;

/// How long a toast stays on screen
const TOAST_DURATION_SECS: i64 = 4;

/// Toasts kept at most; older ones are dropped first
const MAX_TOASTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(TOAST_DURATION_SECS)
    }
}

/// Sending half. Clone freely; sending never fails from the caller's view.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Toast>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, toast: Toast) {
        if self.tx.send(toast).is_err() {
            debug!("Toast dropped - no receiver");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(Toast::new(ToastLevel::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Toast::new(ToastLevel::Error, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(Toast::new(ToastLevel::Info, message));
    }
}

/// Receiving half plus the toasts currently on screen.
pub struct ToastQueue {
    rx: mpsc::UnboundedReceiver<Toast>,
    live: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new(rx: mpsc::UnboundedReceiver<Toast>) -> Self {
        Self {
            rx,
            live: VecDeque::new(),
        }
    }

    /// Pull newly sent toasts and drop expired ones.
    pub fn poll(&mut self, now: DateTime<Utc>) {
        while let Ok(toast) = self.rx.try_recv() {
            self.live.push_back(toast);
            if self.live.len() > MAX_TOASTS {
                self.live.pop_front();
            }
        }
        self.live.retain(|t| !t.is_expired(now));
    }

    /// The toast to show: the newest one still alive.
    pub fn current(&self) -> Option<&Toast> {
        self.live.back()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
