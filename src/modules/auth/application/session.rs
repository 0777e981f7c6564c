//! Admin session handling.
//!
//! Login goes through a validated request object, forces in-memory
//! persistence before the credential exchange, and never stores anything
//! durable. `SessionTracker` folds the gateway's auth-state stream into a
//! watch channel; consumers stay in a loading state until the first callback
//! lands, so an admin surface never flashes as signed-out during startup.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::modules::auth::application::ports::outgoing::auth_gateway::{
    AuthError, AuthGateway, AuthUser, SessionPersistence,
};
use crate::modules::remote::application::ports::outgoing::document_store::ListenerRegistration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("email must not be empty")]
    EmptyEmail,

    #[error("invalid email format")]
    InvalidEmailFormat,

    #[error("password must not be empty")]
    EmptyPassword,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error(transparent)]
    Validation(#[from] LoginValidationError),

    #[error(transparent)]
    Gateway(#[from] AuthError),
}

/// Validated login credentials. Construction normalizes the email to
/// lowercase and rejects malformed input before anything leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if !EmailAddress::is_valid(&email) {
            return Err(LoginValidationError::InvalidEmailFormat);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    /// Signs in with in-memory persistence. The persistence call happens
    /// before the credential exchange so a successful sign-in can never be
    /// written to durable storage.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthUser, AuthServiceError> {
        self.gateway
            .set_persistence(SessionPersistence::Memory)
            .await?;
        let user = self
            .gateway
            .sign_in_with_password(&request.email, &request.password)
            .await?;
        tracing::info!(email = %user.email, "admin signed in");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AuthServiceError> {
        self.gateway.sign_out().await?;
        tracing::info!("admin signed out");
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthServiceError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail.into());
        }
        if !EmailAddress::is_valid(&email) {
            return Err(LoginValidationError::InvalidEmailFormat.into());
        }
        self.gateway.send_password_reset(&email).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<AuthUser>,
    /// True until the first auth-state callback arrives.
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub struct SessionTracker {
    snapshot: Arc<watch::Sender<SessionSnapshot>>,
    registration: Mutex<Option<ListenerRegistration>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionTracker {
    pub async fn start(gateway: &dyn AuthGateway) -> Self {
        let snapshot = Arc::new(
            watch::channel(SessionSnapshot {
                user: None,
                loading: true,
            })
            .0,
        );

        let sub = gateway.subscribe_auth_state().await;
        let mut events = sub.events;
        let sender = snapshot.clone();
        let handle = tokio::spawn(async move {
            while let Some(user) = events.recv().await {
                sender.send_replace(SessionSnapshot {
                    user,
                    loading: false,
                });
            }
        });

        Self {
            snapshot,
            registration: Mutex::new(Some(sub.registration)),
            task: Mutex::new(Some(handle)),
        }
    }

    pub fn current(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.registration.lock() {
            if let Some(registration) = guard.take() {
                registration.cancel();
            }
        }
        if let Ok(mut guard) = self.task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
    }
}
