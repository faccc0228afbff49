use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rosterd::auth::{demo_user, AuthError, AuthProvider, AuthService, User};
use rosterd::storage::{KeyValueStorage, MemoryStorage, DEMO_USER_KEY};

/// Accounts held in memory; enough to drive the provider path.
#[derive(Default)]
struct FakeProvider {
    accounts: Mutex<HashMap<String, String>>,
    current: Mutex<Option<User>>,
}

fn user_for(email: &str) -> User {
    User {
        uid: format!("uid-{email}"),
        email: email.to_string(),
        display_name: None,
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let accounts = self.accounts.lock().expect("accounts");
        match accounts.get(email) {
            Some(p) if p == password => {
                let user = user_for(email);
                *self.current.lock().expect("current") = Some(user.clone());
                Ok(user)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn signup(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        let mut accounts = self.accounts.lock().expect("accounts");
        if accounts.contains_key(email) {
            return Err(AuthError::EmailInUse);
        }
        accounts.insert(email.to_string(), password.to_string());
        let user = user_for(email);
        *self.current.lock().expect("current") = Some(user.clone());
        Ok(user)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        *self.current.lock().expect("current") = None;
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.current.lock().expect("current").clone()
    }
}

fn recorder() -> (
    Arc<Mutex<Vec<Option<String>>>>,
    impl Fn(Option<&User>) + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let cb = move |u: Option<&User>| {
        sink.lock()
            .expect("seen")
            .push(u.map(|u| u.email.clone()));
    };
    (seen, cb)
}

#[tokio::test]
async fn demo_mode_accepts_any_credentials_and_persists_user() {
    let storage = Arc::new(MemoryStorage::new());
    let auth = AuthService::demo(storage.clone());
    assert!(auth.is_demo());
    assert!(!auth.is_logged_in());

    let user = auth.login("who@ever.com", "wrong").await.expect("login");
    assert_eq!(user, demo_user());
    assert!(storage.get(DEMO_USER_KEY).expect("read").is_some());

    // A fresh service over the same storage sees the remembered user.
    let again = AuthService::demo(storage.clone());
    assert_eq!(again.current_user(), Some(demo_user()));

    again.logout().await.expect("logout");
    assert_eq!(storage.get(DEMO_USER_KEY).expect("read"), None);
    assert!(!again.is_logged_in());
}

#[tokio::test]
async fn observers_see_current_state_then_changes_until_dropped() {
    let auth = AuthService::demo(Arc::new(MemoryStorage::new()));
    let (seen, cb) = recorder();
    let sub = auth.observe(cb);

    auth.signup("a@b.com", "pw").await.expect("signup");
    auth.logout().await.expect("logout");
    drop(sub);
    auth.demo_login().expect("demo login");

    let seen = seen.lock().expect("seen").clone();
    assert_eq!(
        seen,
        vec![None, Some("one@one.com".to_string()), None],
    );
}

#[tokio::test]
async fn provider_errors_are_distinguished() {
    let storage = Arc::new(MemoryStorage::new());
    let auth = AuthService::with_provider(storage, Arc::new(FakeProvider::default()));
    assert!(!auth.is_demo());

    let err = auth.login("nobody@x.com", "pw").await.unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(err.to_string(), "Invalid email or password. Please try again.");

    auth.signup("kim@x.com", "secret").await.expect("signup");
    let err = auth.signup("kim@x.com", "other").await.unwrap_err();
    assert_eq!(err, AuthError::EmailInUse);
    assert_eq!(err.code(), "auth/email-already-in-use");

    let err = auth.signup("not-an-email", "pw").await.unwrap_err();
    assert_eq!(err, AuthError::InvalidEmail);

    auth.logout().await.expect("logout");
    assert!(!auth.is_logged_in());
    let user = auth.login("kim@x.com", "secret").await.expect("login");
    assert_eq!(auth.current_user(), Some(user));
}

#[tokio::test]
async fn demo_login_overrides_provider_until_logout() {
    let storage = Arc::new(MemoryStorage::new());
    let auth = AuthService::with_provider(storage, Arc::new(FakeProvider::default()));
    auth.demo_login().expect("demo login");
    assert_eq!(auth.current_user(), Some(demo_user()));
    auth.logout().await.expect("logout");
    assert_eq!(auth.current_user(), None);
}
