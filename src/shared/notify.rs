//! Toast-style user notifications.
//!
//! Remote failures are not propagated past the store; they are logged and
//! turned into a notification the UI layer renders. The channel is unbounded
//! and fire-and-forget: a missing consumer must never block a write path.

use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Toast>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// A notifier whose toasts go nowhere; handy when no UI is attached.
    pub fn disconnected() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self { tx }
    }

    pub fn show(&self, level: ToastLevel, message: impl Into<String>) {
        let toast = Toast {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
        };
        let _ = self.tx.send(toast);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastLevel::Error, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastLevel::Success, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toasts_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.success("saved");
        notifier.error("failed to save");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.level, ToastLevel::Success);
        assert_eq!(first.message, "saved");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.level, ToastLevel::Error);
    }

    #[test]
    fn test_disconnected_notifier_does_not_panic() {
        let notifier = Notifier::disconnected();
        notifier.error("nobody is listening");
    }
}
