//! Signed-in session: credentials, current identity and route checks.

use std::sync::Arc;

use steamline::roles::{Access, Identity, Route, User, authorize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiError, AuthApi, Credentials, Registration},
    storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    LoginFailed(String),

    #[error("{0}")]
    RegistrationFailed(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("please log in first")]
    NotSignedIn,

    #[error("your role cannot open {requested}")]
    Forbidden { requested: String },

    #[error("no such page: {0}")]
    UnknownRoute(String),

    #[error("failed to encode session")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the persisted `token` and `user` entries.
#[derive(Clone)]
pub struct Session {
    auth: Arc<dyn AuthApi>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { auth, store }
    }

    /// Sign in and persist the token and user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LoginFailed`] with the backend's message (or
    /// "Login failed") when the credentials are rejected, or a
    /// [`SessionError::Storage`] if the session cannot be saved. Nothing is
    /// left stored in that case.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, SessionError> {
        let response = self
            .auth
            .login(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|error| SessionError::LoginFailed(error.message_or("Login failed")))?;

        let user_json = serde_json::to_string(&response.user).map_err(SessionError::Encode)?;

        self.store.set(TOKEN_KEY, &response.access_token)?;

        if let Err(error) = self.store.set(USER_KEY, &user_json) {
            if let Err(cleanup) = self.store.remove(TOKEN_KEY) {
                warn!(error = %cleanup, "failed to drop token after incomplete sign in");
            }

            return Err(error.into());
        }

        let identity = Identity::from(&response.user);

        info!(user_id = %identity.id, role = %identity.role, "signed in");

        Ok(identity)
    }

    /// Forget the token and user.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the entries cannot be removed.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;

        info!("signed out");

        Ok(())
    }

    /// The persisted user. A corrupt entry counts as signed out.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    pub fn current_user(&self) -> Result<Option<User>, SessionError> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(error) => {
                warn!(%error, "ignoring unreadable stored user");
                Ok(None)
            }
        }
    }

    /// The signed-in identity, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    pub fn current(&self) -> Result<Option<Identity>, SessionError> {
        Ok(self.current_user()?.as_ref().map(Identity::from))
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingField`] for blank required fields, or
    /// [`SessionError::RegistrationFailed`] with the backend's message.
    pub async fn register(&self, registration: Registration) -> Result<(), SessionError> {
        if registration.username.trim().is_empty() {
            return Err(SessionError::MissingField("username"));
        }

        if registration.password.is_empty() {
            return Err(SessionError::MissingField("password"));
        }

        self.auth
            .register(registration)
            .await
            .map_err(|error: ApiError| {
                SessionError::RegistrationFailed(error.message_or("Registration failed"))
            })
    }

    /// Check that the current identity may open `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotSignedIn`] when the guard sends the user to
    /// the login page, [`SessionError::Forbidden`] when it sends them to the
    /// dashboard, and [`SessionError::UnknownRoute`] for unknown paths.
    pub fn require(&self, path: &str) -> Result<Option<Identity>, SessionError> {
        let identity = self.current()?;

        match authorize(path, identity.as_ref()) {
            Access::Granted(_) => Ok(identity),
            Access::Redirect(Route::Login) => Err(SessionError::NotSignedIn),
            Access::Redirect(Route::Landing) => Err(SessionError::UnknownRoute(path.to_string())),
            Access::Redirect(_) => Err(SessionError::Forbidden {
                requested: path.to_string(),
            }),
        }
    }

    /// Like [`Session::require`] for pages that only exist behind sign-in.
    ///
    /// # Errors
    ///
    /// See [`Session::require`].
    pub fn require_identity(&self, route: Route) -> Result<Identity, SessionError> {
        self.require(&route.path())?.ok_or(SessionError::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use steamline::{
        ids::UserId,
        roles::{Role, User},
    };
    use testresult::TestResult;

    use super::*;
    use crate::{
        api::{LoginResponse, MockAuthApi},
        storage::MemoryStore,
    };

    fn cashier() -> User {
        User {
            id: UserId::new(5),
            username: "kasir".to_string(),
            full_name: Some("Kasir Satu".to_string()),
            phone: None,
            role: Role::Cashier,
        }
    }

    fn session(auth: MockAuthApi) -> (Session, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());

        (Session::new(Arc::new(auth), store.clone()), store)
    }

    #[tokio::test]
    async fn login_persists_token_and_user() -> TestResult {
        let mut auth = MockAuthApi::new();

        auth.expect_login()
            .once()
            .withf(|credentials| credentials.username == "kasir")
            .return_once(|_| {
                Ok(LoginResponse {
                    access_token: "jwt".to_string(),
                    user: cashier(),
                })
            });
        auth.expect_register().never();

        let (session, store) = session(auth);

        let identity = session.login("kasir", "secret").await?;

        assert_eq!(identity.display_name, "Kasir Satu");
        assert_eq!(store.get(TOKEN_KEY)?.as_deref(), Some("jwt"));
        assert_eq!(session.current()?, Some(identity));

        Ok(())
    }

    /// Accepts every write except the one to `rejected`.
    struct RejectingStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.rejected {
                return Err(StorageError::InvalidKey(key.to_string()));
            }

            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn failed_user_write_leaves_no_token_behind() -> TestResult {
        let mut auth = MockAuthApi::new();

        auth.expect_login().once().return_once(|_| {
            Ok(LoginResponse {
                access_token: "jwt".to_string(),
                user: cashier(),
            })
        });

        let store = Arc::new(RejectingStore {
            inner: MemoryStore::new(),
            rejected: USER_KEY,
        });
        let session = Session::new(Arc::new(auth), store.clone());

        let result = session.login("kasir", "secret").await;

        assert!(matches!(result, Err(SessionError::Storage(_))));
        assert_eq!(store.get(TOKEN_KEY)?, None);
        assert_eq!(session.current()?, None);

        Ok(())
    }

    #[tokio::test]
    async fn login_failure_uses_backend_message() {
        let mut auth = MockAuthApi::new();

        auth.expect_login().once().return_once(|_| {
            Err(ApiError::Unauthorized {
                message: Some("Bad username or password".to_string()),
            })
        });

        let (session, store) = session(auth);

        let result = session.login("x", "y").await;

        assert!(
            matches!(result, Err(SessionError::LoginFailed(ref msg)) if msg == "Bad username or password")
        );
        assert!(matches!(store.get(TOKEN_KEY), Ok(None)));
    }

    #[tokio::test]
    async fn login_failure_without_message_has_default() {
        let mut auth = MockAuthApi::new();

        auth.expect_login().once().return_once(|_| {
            Err(ApiError::Server {
                status: 500,
                message: None,
            })
        });

        let (session, _store) = session(auth);

        assert!(matches!(
            session.login("x", "y").await,
            Err(SessionError::LoginFailed(ref msg)) if msg == "Login failed"
        ));
    }

    #[test]
    fn logout_clears_entries() -> TestResult {
        let (session, store) = session(MockAuthApi::new());

        store.set(TOKEN_KEY, "jwt")?;
        store.set(USER_KEY, &serde_json::to_string(&cashier())?)?;

        session.logout()?;

        assert_eq!(session.current()?, None);
        assert_eq!(store.get(TOKEN_KEY)?, None);

        Ok(())
    }

    #[test]
    fn corrupt_user_counts_as_signed_out() -> TestResult {
        let (session, store) = session(MockAuthApi::new());

        store.set(USER_KEY, "{not json")?;

        assert_eq!(session.current()?, None);
        assert!(matches!(
            session.require("/app/dashboard"),
            Err(SessionError::NotSignedIn)
        ));

        Ok(())
    }

    #[test]
    fn require_enforces_roles() -> TestResult {
        let (session, store) = session(MockAuthApi::new());

        store.set(USER_KEY, &serde_json::to_string(&cashier())?)?;

        assert!(session.require("/app/orders/3")?.is_some());
        assert!(matches!(
            session.require("/app/users"),
            Err(SessionError::Forbidden { .. })
        ));
        assert!(session.require("/track")?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_blank_username_without_request() {
        let mut auth = MockAuthApi::new();
        auth.expect_register().never();

        let (session, _store) = session(auth);

        let result = session
            .register(Registration {
                username: " ".to_string(),
                password: "pw".to_string(),
                full_name: String::new(),
                phone: String::new(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::MissingField("username"))));
    }
}
