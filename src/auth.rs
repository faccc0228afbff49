//! Sign-in state for the dashboard.
//!
//! A configured [`AuthProvider`] handles real accounts. Without one the
//! service runs in demo mode: every login or signup succeeds as a fixed demo
//! user, remembered under the `demo-user` storage key so it survives restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, warn};

use crate::storage::{SharedStorage, DEMO_USER_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

pub fn demo_user() -> User {
    User {
        uid: "demo-user-123".into(),
        email: "one@one.com".into(),
        display_name: Some("Demo User".into()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
    #[error("Email is already in use. Please use a different email or log in.")]
    EmailInUse,
    #[error("Invalid email address format.")]
    InvalidEmail,
    #[error("Demo login failed. Please try again.")]
    DemoUnavailable,
    #[error("{0}")]
    Provider(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "auth/invalid-credential",
            AuthError::EmailInUse => "auth/email-already-in-use",
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::DemoUnavailable => "auth/demo-unavailable",
            AuthError::Provider(_) => "auth/provider-error",
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;
    async fn signup(&self, email: &str, password: &str) -> Result<User, AuthError>;
    async fn logout(&self) -> Result<(), AuthError>;
    fn current_user(&self) -> Option<User>;
}

type Listener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Keeps an auth-state callback registered until dropped.
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut l) = listeners.lock() {
                l.entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

pub struct AuthService {
    provider: Option<Arc<dyn AuthProvider>>,
    storage: SharedStorage,
    listeners: Arc<Mutex<Listeners>>,
}

impl AuthService {
    pub fn demo(storage: SharedStorage) -> Self {
        Self {
            provider: None,
            storage,
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    pub fn with_provider(storage: SharedStorage, provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider: Some(provider),
            ..Self::demo(storage)
        }
    }

    pub fn is_demo(&self) -> bool {
        self.provider.is_none()
    }

    /// Stored demo user first, then whatever the provider reports.
    pub fn current_user(&self) -> Option<User> {
        if let Some(user) = self.stored_demo_user() {
            return Some(user);
        }
        self.provider.as_ref().and_then(|p| p.current_user())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    fn stored_demo_user(&self) -> Option<User> {
        match self.storage.get(DEMO_USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable demo user");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read demo user");
                None
            }
        }
    }

    /// Signs in as the demo user regardless of provider.
    pub fn demo_login(&self) -> Result<User, AuthError> {
        let user = demo_user();
        let raw = serde_json::to_string(&user).map_err(|_| AuthError::DemoUnavailable)?;
        self.storage.set(DEMO_USER_KEY, &raw).map_err(|e| {
            warn!(error = %e, "failed to store demo user");
            AuthError::DemoUnavailable
        })?;
        debug!(email = %user.email, "demo login");
        self.notify(Some(&user));
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(provider) = &self.provider else {
            return self.demo_login();
        };
        let user = provider.login(email, password).await?;
        debug!(email = %user.email, "login");
        self.notify(Some(&user));
        Ok(user)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(provider) = &self.provider else {
            return self.demo_login();
        };
        let user = provider.signup(email, password).await?;
        debug!(email = %user.email, "signup");
        self.notify(Some(&user));
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        let had_demo_user = self.stored_demo_user().is_some();
        if had_demo_user || self.provider.is_none() {
            if let Err(e) = self.storage.remove(DEMO_USER_KEY) {
                warn!(error = %e, "failed to clear demo user");
            }
        }
        if !had_demo_user {
            if let Some(provider) = &self.provider {
                provider.logout().await?;
            }
        }
        debug!("logout");
        self.notify(None);
        Ok(())
    }

    /// Calls `callback` now with the current user, then on every sign-in or
    /// sign-out until the returned subscription is dropped.
    pub fn observe(&self, callback: impl Fn(Option<&User>) + Send + Sync + 'static) -> Subscription {
        let callback: Listener = Arc::new(callback);
        callback(self.current_user().as_ref());

        let id = match self.listeners.lock() {
            Ok(mut l) => {
                l.next_id += 1;
                let id = l.next_id;
                l.entries.push((id, callback));
                id
            }
            Err(_) => 0,
        };
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    fn notify(&self, user: Option<&User>) {
        let snapshot: Vec<Listener> = match self.listeners.lock() {
            Ok(l) => l.entries.iter().map(|(_, f)| f.clone()).collect(),
            Err(_) => return,
        };
        for f in snapshot {
            f(user);
        }
    }
}
