//! Session state and the store that owns it.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is the only writer of `Session`. Pages call its async
//! operations; the app root subscribes once and mirrors every change into a
//! Leptos signal, so components read session state reactively instead of
//! through a global.
//!
//! CONCURRENCY
//! ===========
//! Everything runs on the single UI thread, so interior mutability is plain
//! `Cell`/`RefCell` and no borrow is held across an `.await`.
//!
//! Two counters order concurrent work. Forced resets (expiry, logout) bump
//! `resets`; a login that started before a reset discards its result when it
//! lands, which is how expiry wins over a login still in flight. Overlapping
//! logins do not cancel each other. Every local change, including a login,
//! also bumps `epoch`, and a `/auth/me` answer issued under an older epoch is
//! dropped.
//! `/auth/me` queries are single-flight: concurrent bootstrap/refresh callers
//! await the same `Shared` future.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::net::api::AuthApi;
use crate::net::error::{ApiError, ApiErrorKind};
use crate::net::transport::Transport;
use crate::net::types::{Credentials, SignupPayload, User};

/// Lifecycle phase of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing known yet; bootstrap has not started.
    #[default]
    Uninitialized,
    /// The startup session check is in flight.
    Loading,
    /// Settled: `user` is authoritative.
    Ready,
}

/// Current authentication state. A user is only ever present when `Ready`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    status: SessionStatus,
}

impl Session {
    pub fn loading() -> Self {
        Self { user: None, status: SessionStatus::Loading }
    }

    pub fn anonymous() -> Self {
        Self { user: None, status: SessionStatus::Ready }
    }

    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user), status: SessionStatus::Ready }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Notification delivered to store subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session value changed.
    Changed(Session),
    /// The server declared the session expired. Follows the `Changed` that
    /// cleared the user.
    Expired,
}

type Subscriber = Rc<dyn Fn(&SessionEvent)>;
type PendingQuery = Shared<LocalBoxFuture<'static, ()>>;

struct Inner {
    api: AuthApi,
    session: RefCell<Session>,
    /// Generation of `/auth/me` queries; any local session change bumps it.
    epoch: Cell<u64>,
    /// Count of session resets (expiry, logout). Sign-ins started before a
    /// reset are dropped; a later sign-in never invalidates an earlier one.
    resets: Cell<u64>,
    bootstrap_started: Cell<bool>,
    /// In-flight `/auth/me` query and the epoch it was issued under.
    pending_query: RefCell<Option<(u64, PendingQuery)>>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_subscriber_id: Cell<u64>,
}

/// Owner of the client's authentication state. Cheap to clone; clones share
/// the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl SessionStore {
    /// Build a store over `transport` and register as its expiry handler.
    pub fn new(transport: Rc<Transport>) -> Self {
        let inner = Rc::new(Inner {
            api: AuthApi::new(transport.clone()),
            session: RefCell::new(Session::default()),
            epoch: Cell::new(0),
            resets: Cell::new(0),
            bootstrap_started: Cell::new(false),
            pending_query: RefCell::new(None),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber_id: Cell::new(0),
        });

        let weak = Rc::downgrade(&inner);
        transport.set_expiry_handler(Rc::new(move |err: &ApiError| {
            if let Some(inner) = weak.upgrade() {
                SessionStore { inner }.expire(err);
            }
        }));

        Self { inner }
    }

    pub fn api(&self) -> &AuthApi {
        &self.inner.api
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    /// Receive every future `SessionEvent` until the returned handle drops.
    pub fn subscribe(&self, subscriber: impl Fn(&SessionEvent) + 'static) -> Subscription {
        let id = self.inner.next_subscriber_id.get();
        self.inner.next_subscriber_id.set(id + 1);
        self.inner.subscribers.borrow_mut().push((id, Rc::new(subscriber)));
        Subscription { store: Some(Rc::downgrade(&self.inner)), id }
    }

    /// Establish the initial session from the cookie, once per store.
    ///
    /// Never fails: any error (including "no session") settles as anonymous.
    /// Concurrent callers share the first call's request; calls after it
    /// settled return the current state without touching the network.
    pub async fn bootstrap(&self) -> Session {
        if !self.inner.bootstrap_started.replace(true) {
            if self.session().status() == SessionStatus::Uninitialized {
                self.set_session(Session::loading());
            }
            self.query_current_user().await;
        } else {
            let pending = self.inner.pending_query.borrow().as_ref().map(|(_, query)| query.clone());
            if let Some(pending) = pending {
                pending.await;
            }
        }
        self.session()
    }

    /// Re-check the session against `/auth/me`.
    ///
    /// A server answer of "no session" clears the user; a network failure
    /// leaves an authenticated user in place.
    pub async fn refresh(&self) -> Session {
        self.query_current_user().await;
        self.session()
    }

    /// Sign in. On success the session becomes authenticated.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] and leaves the session unchanged
    /// when the backend rejects the credentials or the request fails. If the
    /// session was reset (expiry, logout) while the request was in flight, the
    /// late success is discarded and [`ApiError::superseded`] is returned.
    /// Overlapping sign-ins all apply in the order they land, so the last one
    /// matches the cookie the browser ends up holding.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let resets = self.inner.resets.get();
        let user = self.inner.api.login(credentials).await?;
        if self.inner.resets.get() != resets {
            log::warn!("discarding sign-in for {}: session reset while in flight", user.username);
            return Err(ApiError::superseded());
        }
        self.advance_epoch();
        self.set_session(Session::authenticated(user.clone()));
        log::info!("signed in as {}", user.username);
        Ok(user)
    }

    /// Sign out. Local state is cleared whatever the backend answers.
    pub async fn logout(&self) {
        if let Err(err) = self.inner.api.logout().await {
            log::warn!("logout request failed, clearing local session anyway: {err}");
        }
        self.reset();
        self.set_session(Session::anonymous());
    }

    /// Create an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`], including server field errors.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<String, ApiError> {
        self.inner.api.signup(payload).await
    }

    fn query_current_user(&self) -> PendingQuery {
        let epoch = self.inner.epoch.get();
        if let Some((issued, query)) = self.inner.pending_query.borrow().as_ref() {
            if *issued == epoch {
                return query.clone();
            }
        }

        let weak = Rc::downgrade(&self.inner);
        let api = self.inner.api.clone();
        let query = async move {
            let result = api.current_user().await;
            if let Some(inner) = weak.upgrade() {
                SessionStore { inner }.settle_query(epoch, result);
            }
        }
        .boxed_local()
        .shared();

        *self.inner.pending_query.borrow_mut() = Some((epoch, query.clone()));
        query
    }

    fn settle_query(&self, epoch: u64, result: Result<User, ApiError>) {
        {
            let mut pending = self.inner.pending_query.borrow_mut();
            if pending.as_ref().is_some_and(|(issued, _)| *issued == epoch) {
                pending.take();
            }
        }

        if self.inner.epoch.get() != epoch {
            log::debug!("discarding stale session check");
            return;
        }

        match result {
            Ok(user) => self.set_session(Session::authenticated(user)),
            Err(err) if err.kind == ApiErrorKind::Transport => {
                log::warn!("session check failed: {err}");
                let current = self.session();
                if !current.is_authenticated() {
                    self.set_session(Session::anonymous());
                }
            }
            Err(err) => {
                log::debug!("no active session: {err}");
                self.set_session(Session::anonymous());
            }
        }
    }

    fn expire(&self, err: &ApiError) {
        log::warn!("session expired: {err}");
        self.reset();
        self.set_session(Session::anonymous());
        self.notify(&SessionEvent::Expired);
    }

    fn reset(&self) {
        self.inner.resets.set(self.inner.resets.get() + 1);
        self.advance_epoch();
    }

    fn advance_epoch(&self) {
        self.inner.epoch.set(self.inner.epoch.get() + 1);
    }

    fn set_session(&self, next: Session) {
        {
            let mut session = self.inner.session.borrow_mut();
            if *session == next {
                return;
            }
            *session = next.clone();
        }
        self.notify(&SessionEvent::Changed(next));
    }

    fn notify(&self, event: &SessionEvent) {
        let subscribers: Vec<Subscriber> =
            self.inner.subscribers.borrow().iter().map(|(_, s)| s.clone()).collect();
        for subscriber in subscribers {
            subscriber(event);
        }
    }
}

/// Handle returned by [`SessionStore::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    store: Option<Weak<Inner>>,
    id: u64,
}

impl Subscription {
    /// Keep the subscriber registered for the rest of the store's life.
    pub fn detach(mut self) {
        self.store.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.take().and_then(|weak| weak.upgrade()) {
            inner.subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
