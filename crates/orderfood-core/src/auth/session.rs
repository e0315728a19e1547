use std::sync::Mutex;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Authorizer, CredentialStore, StoredCredential};
use crate::api::{ApiClient, ApiError, ApiSettings};
use crate::models::Identity;
use crate::notify::Notifier;

/// The current authentication state.
///
/// Token and user live together in one optional credential, so a session
/// can never hold one without the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credential: Option<StoredCredential>,
    resolved: bool,
}

impl Session {
    /// Initial state before stored credentials have been read.
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn anonymous() -> Self {
        Self {
            credential: None,
            resolved: true,
        }
    }

    pub fn authenticated(token: impl Into<String>, user: Identity) -> Self {
        Self {
            credential: Some(StoredCredential {
                token: token.into(),
                user,
            }),
            resolved: true,
        }
    }

    pub fn user(&self) -> Option<&Identity> {
        self.credential.as_ref().map(|c| &c.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.credential.as_ref().map(|c| c.token.as_str())
    }

    pub fn credential(&self) -> Option<&StoredCredential> {
        self.credential.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    fn name(&self) -> &'static str {
        match self {
            AuthAction::Login => "login",
            AuthAction::Register => "register",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            AuthAction::Login => "Logged in successfully!",
            AuthAction::Register => "Registration successful!",
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self {
            AuthAction::Login => "Login failed. Please try again.",
            AuthAction::Register => "Registration failed.",
        }
    }
}

/// Owns the session and the persisted credential, and keeps them in step.
///
/// All methods take `&self`; wrap the manager in an `Arc` to drive it from
/// spawned tasks. Overlapping login/register calls are not serialized: the
/// one that finishes last decides the final session.
pub struct SessionManager {
    state: watch::Sender<Session>,
    store: CredentialStore,
    api: ApiClient,
    notifier: Notifier,
    /// Held while writing the store and publishing, so the two never diverge
    commit_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(settings: &ApiSettings, store: CredentialStore, notifier: Notifier) -> Result<Self> {
        let (state, _) = watch::channel(Session::unresolved());
        let api = ApiClient::new(settings, Authorizer::new(state.subscribe()))?;
        Ok(Self {
            state,
            store,
            api,
            notifier,
            commit_lock: Mutex::new(()),
        })
    }

    /// API client whose requests carry this session's token.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Load the persisted credential. Called once at startup; never touches
    /// the network.
    pub fn restore(&self) -> Session {
        let session = match self.store.get() {
            Ok(Some(credential)) => {
                debug!(user_id = %credential.user.id, "Restored stored session");
                Session::authenticated(credential.token, credential.user)
            }
            Ok(None) => {
                debug!("No stored session");
                Session::anonymous()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored session, starting logged out");
                Session::anonymous()
            }
        };

        let _guard = self.commit_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.state.send_replace(session.clone());
        session
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        self.authenticate(AuthAction::Login, email, password).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        self.authenticate(AuthAction::Register, email, password).await
    }

    /// Forget the session locally. Always succeeds; calling it while logged
    /// out changes nothing.
    pub fn logout(&self) {
        self.commit(Session::anonymous());
        info!("Logged out");
        self.notifier.success("Logged out.");
    }

    async fn authenticate(
        &self,
        action: AuthAction,
        email: &str,
        password: &str,
    ) -> Result<Identity, ApiError> {
        let result = match action {
            AuthAction::Login => self.api.login(email, password).await,
            AuthAction::Register => self.api.register(email, password).await,
        };

        match result {
            Ok(auth) => {
                let user = auth.user.clone();
                self.commit(Session::authenticated(auth.token, auth.user));
                info!(action = action.name(), user_id = %user.id, "Authentication succeeded");
                self.notifier.success(action.success_message());
                Ok(user)
            }
            Err(e) => {
                warn!(action = action.name(), error = %e, "Authentication failed");
                self.notifier.error(e.user_message(action.failure_fallback()));
                Err(e)
            }
        }
    }

    /// Persist then publish, as one step for any observer.
    fn commit(&self, session: Session) {
        let _guard = self.commit_lock.lock().unwrap_or_else(|e| e.into_inner());

        let persisted = match session.credential() {
            Some(credential) => self.store.set(&credential.token, &credential.user),
            None => self.store.clear(),
        };
        if let Err(e) = persisted {
            warn!(error = %e, "Failed to persist session");
        }

        self.state.send_replace(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::testing::RejectUserWrites;
    use crate::auth::KeyValueStore;
    use crate::notify::ToastQueue;

    fn user() -> Identity {
        Identity {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    fn manager_with(store: CredentialStore) -> (SessionManager, ToastQueue) {
        let (notifier, rx) = Notifier::channel();
        let settings = ApiSettings::new("http://127.0.0.1:9");
        let manager = SessionManager::new(&settings, store, notifier).expect("client builds");
        (manager, ToastQueue::new(rx))
    }

    #[test]
    fn test_session_constructors() {
        let fresh = Session::unresolved();
        assert!(!fresh.is_resolved());
        assert!(fresh.user().is_none() && fresh.token().is_none());

        let anon = Session::anonymous();
        assert!(anon.is_resolved());
        assert!(!anon.is_authenticated());

        let authed = Session::authenticated("t1", user());
        assert_eq!(authed.token(), Some("t1"));
        assert_eq!(authed.user(), Some(&user()));
        assert_eq!(authed.user().is_some(), authed.token().is_some());
    }

    #[test]
    fn test_starts_unresolved() {
        let (manager, _) = manager_with(CredentialStore::in_memory());
        assert_eq!(manager.current(), Session::unresolved());
    }

    #[test]
    fn test_restore_fresh_storage() {
        let (manager, _) = manager_with(CredentialStore::in_memory());
        let session = manager.restore();
        assert_eq!(session, Session::anonymous());
        assert_eq!(manager.current(), Session::anonymous());
    }

    #[test]
    fn test_restore_stored_credential() {
        let store = CredentialStore::in_memory();
        store.set("t1", &user()).expect("writable");
        let (manager, _) = manager_with(store);

        let session = manager.restore();
        assert_eq!(session, Session::authenticated("t1", user()));
        assert_eq!(manager.api().authorizer().token().as_deref(), Some("t1"));
    }

    #[test]
    fn test_commit_publishes_when_persist_fails() {
        let backend = RejectUserWrites::default();
        let (manager, _) = manager_with(CredentialStore::new(backend.clone()));
        manager.restore();

        manager.commit(Session::authenticated("t1", user()));

        let session = manager.current();
        assert_eq!(session, Session::authenticated("t1", user()));
        assert_eq!(session.user().is_some(), session.token().is_some());
        assert_eq!(manager.api().authorizer().token().as_deref(), Some("t1"));
        // Storage holds nothing, not a token without its user
        assert_eq!(manager.store.get().expect("readable"), None);
        assert_eq!(backend.inner.get("token").expect("readable"), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = CredentialStore::in_memory();
        store.set("t1", &user()).expect("writable");
        let (manager, mut toasts) = manager_with(store);
        manager.restore();

        manager.logout();
        let once = manager.current();
        manager.logout();
        let twice = manager.current();

        assert_eq!(once, Session::anonymous());
        assert_eq!(once, twice);
        assert_eq!(manager.store.get().expect("readable"), None);

        toasts.poll(chrono::Utc::now());
        assert_eq!(toasts.current().map(|t| t.message.as_str()), Some("Logged out."));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = CredentialStore::in_memory();
        store.set("t1", &user()).expect("writable");
        let (manager, _) = manager_with(store);
        let mut rx = manager.subscribe();

        manager.restore();
        assert!(rx.has_changed().expect("sender alive"));
        assert!(rx.borrow_and_update().is_authenticated());

        manager.logout();
        assert!(rx.has_changed().expect("sender alive"));
        assert!(!rx.borrow_and_update().is_authenticated());
    }
}
