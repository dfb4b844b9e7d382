//! Session manager
//!
//! Owns the authentication state machine and is the only writer of the
//! credential store.
//!
//! ```text
//! Uninitialized ──► Initializing ──► Authenticated ◄──► Refreshing
//!       │                │                 │                 │
//!       └────────────────┴────────► Anonymous ◄──────────────┘
//! ```
//!
//! `login` and `register` move any phase straight to `Authenticated`.
//! Every commit writes the credential store before publishing the new
//! session, so an `Authenticated` snapshot always has a matching token pair
//! behind it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use invoicedesk_domain::constants::{
    AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH, AUTH_REFRESH_PATH, AUTH_REGISTER_PATH,
};
use invoicedesk_domain::{
    AuthPayload, DashboardError, Identity, LoginRequest, Phase, RefreshRequest, RegisterRequest,
    Result, Session,
};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::ports::CredentialStore;
use crate::transport::{decode_data, ApiRequest, Transport};

type SharedRefresh = Shared<BoxFuture<'static, Result<Arc<Identity>>>>;

/// Authentication state machine with single-flight token refresh.
///
/// Cheap to clone; all clones observe and drive the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<Session>,
    /// The refresh currently in flight, if any, tagged with the sequence
    /// number it was started under.
    refresh_slot: Mutex<Option<(u64, SharedRefresh)>>,
    refresh_seq: AtomicU64,
    /// Bumped by login, register, logout and teardown. A refresh commits its
    /// outcome only while the generation it started under is still current.
    generation: AtomicU64,
    /// Held while writing the store and publishing the matching session.
    commit_lock: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `Uninitialized` phase without touching the
    /// network. Call [`SessionManager::initialize`] to restore a stored
    /// session.
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::uninitialized());
        Self {
            inner: Arc::new(Inner {
                transport,
                store,
                state,
                refresh_slot: Mutex::new(None),
                refresh_seq: AtomicU64::new(0),
                generation: AtomicU64::new(0),
                commit_lock: Mutex::new(()),
            }),
        }
    }

    /// Create a manager and run the silent startup check.
    pub async fn start(transport: Arc<dyn Transport>, store: Arc<dyn CredentialStore>) -> Self {
        let manager = Self::new(transport, store);
        manager.initialize().await;
        manager
    }

    /// Restore a stored session, if there is one.
    ///
    /// With both tokens present the manager moves to `Initializing` and
    /// refreshes; otherwise it goes straight to `Anonymous`. A failed refresh
    /// is logged and swallowed: this is a background check, not a user
    /// action. Only the first call has any effect.
    pub async fn initialize(&self) {
        let has_credentials = self.inner.store.credentials().is_some();

        let claimed = {
            let _commit = self.inner.commit_lock.lock();
            let phase = self.inner.state.borrow().phase;
            if phase != Phase::Uninitialized {
                false
            } else {
                if has_credentials {
                    self.inner.publish(Session { identity: None, phase: Phase::Initializing });
                } else {
                    // A lone token cannot be used for anything.
                    self.inner.store.clear();
                    self.inner.publish(Session::anonymous());
                }
                true
            }
        };

        if !claimed {
            debug!(phase = %self.phase(), "session already initialized");
            return;
        }

        if !has_credentials {
            info!("no stored session; starting anonymous");
            return;
        }

        match self.refresh().await {
            Ok(identity) => info!(user_id = %identity.id, "stored session restored"),
            Err(err) => {
                warn!(error = %err, "stored session could not be restored; continuing anonymously");
            }
        }
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    /// Propagates the transport failure, typically `DashboardError::Rejected`
    /// carrying the server's message. The session is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Arc<Identity>> {
        let request =
            ApiRequest::post(AUTH_LOGIN_PATH).public().with_json(&LoginRequest::new(email, password))?;

        match self.authenticate(request).await {
            Ok(identity) => {
                info!(user_id = %identity.id, "logged in");
                Ok(identity)
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                Err(err)
            }
        }
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    /// Same as [`SessionManager::login`].
    pub async fn register(&self, fields: &RegisterRequest) -> Result<Arc<Identity>> {
        let request = ApiRequest::post(AUTH_REGISTER_PATH).public().with_json(fields)?;

        match self.authenticate(request).await {
            Ok(identity) => {
                info!(user_id = %identity.id, "registered and logged in");
                Ok(identity)
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                Err(err)
            }
        }
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// At most one refresh request is outstanding at a time; concurrent
    /// callers await the same outcome.
    ///
    /// # Errors
    /// Returns `DashboardError::SessionExpired` when the refresh fails. The
    /// stored credentials are cleared and the session becomes `Anonymous`.
    pub async fn refresh(&self) -> Result<Arc<Identity>> {
        let pending = {
            let mut slot = self.inner.refresh_slot.lock();
            if let Some((_, existing)) = slot.as_ref() {
                debug!("joining refresh already in flight");
                existing.clone()
            } else {
                let seq = self.inner.refresh_seq.fetch_add(1, Ordering::Relaxed);
                let refresh = Inner::run_refresh(Arc::clone(&self.inner), seq).boxed().shared();
                *slot = Some((seq, refresh.clone()));
                refresh
            }
        };

        pending.await
    }

    /// End the session.
    ///
    /// Local credentials are cleared and `Anonymous` is published before the
    /// server is told; the remote call is best effort and never fails the
    /// logout.
    pub async fn logout(&self) {
        let bearer = {
            let _commit = self.inner.commit_lock.lock();
            self.inner.generation.fetch_add(1, Ordering::AcqRel);
            let bearer = self.inner.store.access_token();
            self.inner.store.clear();
            self.inner.publish(Session::anonymous());
            bearer
        };
        info!("logged out locally");

        let Some(token) = bearer else {
            return;
        };

        match self.inner.transport.send(ApiRequest::post(AUTH_LOGOUT_PATH).with_bearer(token)).await {
            Ok(_) => debug!("server acknowledged logout"),
            Err(err) => debug!(error = %err, "remote logout failed; ignoring"),
        }
    }

    /// Drop any pending refresh and discard the outcome of work still in
    /// flight.
    pub fn teardown(&self) {
        let _commit = self.inner.commit_lock.lock();
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.refresh_slot.lock().take();
        debug!("session manager torn down");
    }

    /// Watch every published session change.
    ///
    /// The receiver starts marked as seen, so the first `changed()` resolves
    /// on the next transition rather than the current state.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// The signed-in user, present in `Authenticated` and `Refreshing`.
    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.inner.state.borrow().identity.clone()
    }

    /// Whether requests can currently be made on the user's behalf.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    async fn authenticate(&self, request: ApiRequest) -> Result<Arc<Identity>> {
        let payload: AuthPayload = decode_data(self.inner.transport.send(request).await?)?;
        Ok(self.inner.commit_login(&payload))
    }
}

impl Inner {
    async fn run_refresh(self: Arc<Self>, seq: u64) -> Result<Arc<Identity>> {
        let outcome = self.refresh_once().await;
        // A teardown may have emptied the slot and a newer refresh taken it.
        let mut slot = self.refresh_slot.lock();
        if slot.as_ref().is_some_and(|(current, _)| *current == seq) {
            slot.take();
        }
        outcome
    }

    async fn refresh_once(&self) -> Result<Arc<Identity>> {
        let generation = self.generation.load(Ordering::Acquire);

        let Some(refresh_token) = self.store.refresh_token() else {
            let reason = "No refresh token stored".to_string();
            if self.expire(generation) {
                debug!("refresh requested without a refresh token");
                return Err(DashboardError::SessionExpired(reason));
            }
            return self.superseded();
        };

        self.state.send_if_modified(|session| {
            if session.phase == Phase::Authenticated {
                session.phase = Phase::Refreshing;
                true
            } else {
                false
            }
        });
        debug!("refreshing access token");

        let outcome = match ApiRequest::post(AUTH_REFRESH_PATH)
            .public()
            .with_json(&RefreshRequest { refresh_token })
        {
            Ok(request) => self.transport.send(request).await.and_then(decode_data::<AuthPayload>),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(payload) => match self.commit_refresh(generation, &payload) {
                Some(identity) => {
                    info!(user_id = %identity.id, "session refreshed");
                    Ok(identity)
                }
                None => self.superseded(),
            },
            Err(err) => {
                if self.expire(generation) {
                    warn!(error = %err, "refresh failed; session cleared");
                    Err(DashboardError::SessionExpired(err.user_message()))
                } else {
                    self.superseded()
                }
            }
        }
    }

    /// Resolve a refresh whose outcome arrived after a login, logout or
    /// teardown replaced the session it was started for.
    fn superseded(&self) -> Result<Arc<Identity>> {
        debug!("refresh outcome discarded; session changed while it was in flight");
        let current = self.state.borrow().clone();
        match current.identity {
            Some(identity) if current.is_authenticated() => Ok(identity),
            _ => Err(DashboardError::SessionExpired("Session ended while refreshing".to_string())),
        }
    }

    fn commit_login(&self, payload: &AuthPayload) -> Arc<Identity> {
        let _commit = self.commit_lock.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.write_and_publish(payload)
    }

    fn commit_refresh(&self, generation: u64, payload: &AuthPayload) -> Option<Arc<Identity>> {
        let _commit = self.commit_lock.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return None;
        }
        Some(self.write_and_publish(payload))
    }

    /// Caller holds `commit_lock`.
    fn write_and_publish(&self, payload: &AuthPayload) -> Arc<Identity> {
        self.store.set(&payload.credentials());
        let identity = Arc::new(payload.identity());
        self.publish(Session::authenticated(Arc::clone(&identity)));
        identity
    }

    /// Clear credentials and go `Anonymous`, unless the session moved on.
    fn expire(&self, generation: u64) -> bool {
        let _commit = self.commit_lock.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        self.store.clear();
        self.publish(Session::anonymous());
        true
    }

    fn publish(&self, next: Session) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                debug!(from = %current.phase, to = %next.phase, "session phase changed");
                *current = next;
                true
            }
        });
    }
}
