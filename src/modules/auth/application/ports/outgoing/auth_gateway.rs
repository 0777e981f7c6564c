use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::modules::remote::application::ports::outgoing::document_store::ListenerRegistration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Where a signed-in session may be persisted. Only in-memory sessions are
/// supported; closing the process signs the admin out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPersistence {
    Memory,
    Local,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// Raw provider error code, surfaced verbatim to the caller
    /// (e.g. `INVALID_PASSWORD`, `EMAIL_NOT_FOUND`).
    #[error("{0}")]
    Provider(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Auth-state stream. The current user (or `None`) is delivered immediately
/// on subscribe, then again on every sign-in and sign-out.
#[derive(Debug)]
pub struct AuthStateSubscription {
    pub events: mpsc::UnboundedReceiver<Option<AuthUser>>,
    pub registration: ListenerRegistration,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn set_persistence(&self, persistence: SessionPersistence) -> Result<(), AuthError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    async fn subscribe_auth_state(&self) -> AuthStateSubscription;
}
