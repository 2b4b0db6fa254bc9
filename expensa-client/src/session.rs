//! Who is signed in, and with which privileges.
//!
//! [`SessionStore`] is the only writer of the session. It keeps the in-memory
//! [`Session`] and the persisted record in step, and tells subscribers about
//! every transition after the new state is in place.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use shared::models::{LoginRequest, RoleFlags, UpdateProfileRequest, UserProfile};
use tracing::{debug, info, warn};

use crate::{
    api::{ApiClient, ApiError},
    claims::Claims,
    record::PersistedSession,
    services::AuthService,
    storage::StorageError,
};

/// How much the client trusts the cached profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileState {
    /// Nothing fetched yet in this process; the profile comes from the
    /// persisted record or the token claims.
    #[default]
    Unknown,
    /// Confirmed by the current-user call.
    Loaded,
    /// The last current-user call failed for a reason other than the
    /// credential; the previous profile and roles are kept.
    Stale,
}

/// Immutable copy of the session, handed to renderers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub roles: RoleFlags,
    pub user: Option<UserProfile>,
    pub profile: ProfileState,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.roles.is_manager
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(UserProfile::display_name)
    }

    fn from_record(record: PersistedSession) -> Self {
        Self {
            token: Some(record.token),
            roles: record.roles,
            user: record.user,
            profile: ProfileState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    UserRequested,
    /// The backend rejected the credential.
    Expired,
}

/// Screens a transition sends the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    ProfileLoaded,
    ProfileUpdated,
    LoggedOut(LogoutReason),
}

impl SessionEvent {
    /// Where the UI should navigate after this event, if anywhere.
    #[must_use]
    pub const fn landing(self) -> Option<View> {
        match self {
            Self::LoggedIn => Some(View::Dashboard),
            Self::LoggedOut(_) => Some(View::Login),
            Self::ProfileLoaded | Self::ProfileUpdated => None,
        }
    }
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Listener = Rc<dyn Fn(SessionEvent, &Session)>;

/// Shared session handle. Clones observe and mutate the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<StoreInner>,
}

struct StoreInner {
    api: ApiClient,
    state: RefCell<Session>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<usize>,
}

impl SessionStore {
    /// Creates an empty store and registers it for auth failures reported by
    /// `api`. Call [`SessionStore::restore`] or [`SessionStore::initialize`]
    /// to pick up a persisted session.
    pub fn new(api: ApiClient) -> Self {
        let inner = Rc::new(StoreInner {
            api,
            state: RefCell::new(Session::default()),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        });

        let weak: Weak<StoreInner> = Rc::downgrade(&inner);
        inner.api.on_auth_failure(move |status, rejected| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let store = SessionStore { inner };
            let current = store.current_token();
            if current.is_some() && current.as_deref() == rejected {
                info!(%status, "credential rejected by the backend, signing out");
                store.expire();
            } else if current.is_some() {
                debug!(%status, "ignoring rejection of a credential from an earlier session");
            }
        });

        Self { inner }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    fn current_token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    /// Loads the persisted record into memory without touching the network.
    pub fn restore(&self) -> Result<Session, StorageError> {
        let session = PersistedSession::load(self.api().storage().as_ref())?
            .map(Session::from_record)
            .unwrap_or_default();
        debug!(authenticated = session.is_authenticated(), "restored session");
        *self.inner.state.borrow_mut() = session.clone();
        Ok(session)
    }

    /// Restores the persisted session and, when it holds a token, confirms
    /// the profile with the backend.
    ///
    /// # Errors
    /// Storage failures, and current-user failures as described on
    /// [`SessionStore::refresh_profile`].
    pub async fn initialize(&self) -> Result<Session, ApiError> {
        let session = self.restore()?;
        if session.is_authenticated() {
            self.refresh_profile().await
        } else {
            Ok(session)
        }
    }

    /// Fetches the current user and updates roles and profile from it.
    ///
    /// A 401 or 403 ends the session with [`LogoutReason::Expired`]. Other
    /// failures keep token and roles, mark the profile stale, and are
    /// returned. A response that arrives after the session changed is
    /// ignored.
    pub async fn refresh_profile(&self) -> Result<Session, ApiError> {
        let Some(token) = self.current_token() else {
            return Ok(self.snapshot());
        };

        let fetched = AuthService::new(self.api()).current_user().await;
        if self.current_token().as_deref() != Some(token.as_str()) {
            debug!("session changed while the profile was loading, ignoring the response");
            return fetched.map(|_| self.snapshot());
        }

        match fetched {
            Ok(user) => {
                let roles = RoleFlags::from_roles(&user.roles);
                PersistedSession {
                    token: token.clone(),
                    user: Some(user.clone()),
                    roles,
                }
                .save(self.api().storage().as_ref())?;
                self.replace(|session| {
                    session.roles = roles;
                    session.user = Some(user);
                    session.profile = ProfileState::Loaded;
                });
                self.emit(SessionEvent::ProfileLoaded);
                Ok(self.snapshot())
            }
            Err(err) if err.is_auth_failure() || err.is_forbidden() => {
                self.expire();
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "could not load the current user, keeping the cached profile");
                self.replace(|session| session.profile = ProfileState::Stale);
                Err(err)
            }
        }
    }

    /// Starts a session for `token`.
    ///
    /// The token and a minimal profile built from `claims` are persisted
    /// before memory is updated, subscribers then see
    /// [`SessionEvent::LoggedIn`], and the current user is fetched. A profile
    /// fetch that fails for reasons other than the credential leaves the
    /// session signed in with a stale profile.
    pub async fn login(&self, token: &str, claims: &Claims) -> Result<Session, ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::InvalidRequest("empty bearer token".into()));
        }

        let roles = RoleFlags::from_roles(&claims.roles);
        let user = UserProfile::from_claims(claims.sub.clone(), claims.roles.clone());
        PersistedSession {
            token: token.to_string(),
            user: Some(user.clone()),
            roles,
        }
        .save(self.api().storage().as_ref())?;

        self.replace(|session| {
            *session = Session {
                token: Some(token.to_string()),
                roles,
                user: Some(user),
                profile: ProfileState::Unknown,
            };
        });
        info!(user = %claims.sub, "signed in");
        self.emit(SessionEvent::LoggedIn);

        match self.refresh_profile().await {
            Ok(session) => Ok(session),
            Err(err) if err.is_auth_failure() || err.is_forbidden() => Err(err),
            Err(_) => Ok(self.snapshot()),
        }
    }

    /// Signs in with credentials and starts the session from the returned
    /// token.
    pub async fn sign_in(&self, credentials: &LoginRequest) -> Result<Session, ApiError> {
        let response = AuthService::new(self.api()).sign_in(credentials).await?;
        let mut claims = Claims::decode(&response.jwt_token)
            .map_err(|err| ApiError::Decode(format!("sign-in token: {err}")))?;
        if claims.sub.is_empty() {
            claims.sub = response
                .username
                .clone()
                .unwrap_or_else(|| credentials.username.clone());
        }
        if claims.roles.is_empty() {
            claims.roles = response.roles;
        }
        self.login(&response.jwt_token, &claims).await
    }

    /// Ends the session locally. Memory is reset and subscribers are told
    /// even when storage could not be cleared; that failure is returned.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.end(LogoutReason::UserRequested)
    }

    fn expire(&self) {
        if self.is_authenticated() {
            self.end(LogoutReason::Expired).ok();
        }
    }

    fn end(&self, reason: LogoutReason) -> Result<(), StorageError> {
        let cleared = PersistedSession::clear(self.api().storage().as_ref());
        self.replace(|session| *session = Session::default());
        info!(?reason, "signed out");
        self.emit(SessionEvent::LoggedOut(reason));
        cleared
    }

    /// Replaces the cached profile, keeping token and roles.
    pub fn update_profile(&self, user: UserProfile) -> Result<(), StorageError> {
        let Some(token) = self.current_token() else {
            debug!("ignoring profile update without a session");
            return Ok(());
        };
        let roles = self.inner.state.borrow().roles;
        PersistedSession {
            token,
            user: Some(user.clone()),
            roles,
        }
        .save(self.api().storage().as_ref())?;
        self.replace(|session| session.user = Some(user));
        self.emit(SessionEvent::ProfileUpdated);
        Ok(())
    }

    /// Sends a profile change to the backend and caches the result.
    pub async fn save_profile(&self, request: &UpdateProfileRequest) -> Result<UserProfile, ApiError> {
        let updated = AuthService::new(self.api()).update_profile(request).await?;
        self.update_profile(updated.clone())?;
        Ok(updated)
    }

    /// Registers `listener` for every later [`SessionEvent`]. It receives the
    /// session as it is after the transition.
    pub fn subscribe(&self, listener: impl Fn(SessionEvent, &Session) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    fn replace(&self, update: impl FnOnce(&mut Session)) {
        update(&mut self.inner.state.borrow_mut());
    }

    fn emit(&self, event: SessionEvent) {
        let session = self.snapshot();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event, &session);
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
