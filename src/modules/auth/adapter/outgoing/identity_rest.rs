//! `AuthGateway` adapter for the Google Identity Toolkit REST API.
//!
//! Sessions live only in the shared `IdTokenStore`; nothing is written to
//! disk, so requesting local persistence is refused rather than silently
//! downgraded. Auth-state watchers get the current user immediately on
//! subscribe and on every sign-in or sign-out after that.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;

use crate::modules::auth::application::ports::outgoing::auth_gateway::{
    AuthError, AuthGateway, AuthStateSubscription, AuthUser, SessionPersistence,
};
use crate::modules::remote::application::ports::outgoing::document_store::ListenerRegistration;
use crate::shared::credentials::IdTokenStore;

const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    local_id: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Default)]
struct WatcherState {
    next_id: u64,
    senders: HashMap<u64, mpsc::UnboundedSender<Option<AuthUser>>>,
    current: Option<AuthUser>,
}

pub struct IdentityRestGateway {
    http: reqwest::Client,
    api_key: String,
    tokens: Arc<IdTokenStore>,
    watchers: Arc<Mutex<WatcherState>>,
}

impl IdentityRestGateway {
    pub fn new(http: reqwest::Client, api_key: String, tokens: Arc<IdTokenStore>) -> Self {
        Self {
            http,
            api_key,
            tokens,
            watchers: Arc::new(Mutex::new(WatcherState::default())),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{IDENTITY_BASE_URL}/accounts:{action}?key={}", self.api_key)
    }

    fn publish(&self, user: Option<AuthUser>) {
        if let Ok(mut state) = self.watchers.lock() {
            state.current = user.clone();
            state.senders.retain(|_, tx| tx.send(user.clone()).is_ok());
        }
    }

    async fn post(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, AuthError> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }
        // The provider reports failures as an error code in the body; pass
        // that code through untouched.
        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| "UNKNOWN_ERROR".to_string());
        Err(AuthError::Provider(message))
    }
}

#[async_trait]
impl AuthGateway for IdentityRestGateway {
    async fn set_persistence(&self, persistence: SessionPersistence) -> Result<(), AuthError> {
        match persistence {
            SessionPersistence::Memory => Ok(()),
            SessionPersistence::Local => Err(AuthError::Unsupported(
                "sessions are in-memory only".to_string(),
            )),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let response = self
            .post(
                "signInWithPassword",
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        self.tokens.set(body.id_token);
        let user = AuthUser {
            uid: body.local_id,
            email: body.email,
        };
        self.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.tokens.clear();
        self.publish(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.post(
            "sendOobCode",
            json!({
                "requestType": "PASSWORD_RESET",
                "email": email,
            }),
        )
        .await?;
        Ok(())
    }

    async fn subscribe_auth_state(&self) -> AuthStateSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut state = match self.watchers.lock() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            let id = state.next_id;
            state.next_id += 1;
            // Deliver the current state right away, like any attach-time
            // auth callback.
            let _ = tx.send(state.current.clone());
            state.senders.insert(id, tx);
            id
        };

        let watchers = self.watchers.clone();
        let registration = ListenerRegistration::new(move || {
            if let Ok(mut state) = watchers.lock() {
                state.senders.remove(&id);
            }
        });

        AuthStateSubscription {
            events: rx,
            registration,
        }
    }
}
