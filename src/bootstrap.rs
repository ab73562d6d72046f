//! One-time startup: establish the initial session before routes are trusted.
//!
//! Route guards show a placeholder until the session is `Ready`, so nothing
//! renders against a guessed state. Failures are swallowed by the store and
//! settle as an anonymous session; there are no retries here.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use std::cell::Cell;

use crate::state::session::{Session, SessionStore};

pub struct Bootstrapper {
    store: SessionStore,
    started: Cell<bool>,
}

impl Bootstrapper {
    pub fn new(store: SessionStore) -> Self {
        Self { store, started: Cell::new(false) }
    }

    pub fn has_started(&self) -> bool {
        self.started.get()
    }

    /// Run the startup session check. Later calls return the current state.
    pub async fn run(&self) -> Session {
        if self.started.replace(true) {
            return self.store.session();
        }
        let session = self.store.bootstrap().await;
        match session.user() {
            Some(user) => log::info!("session restored for {}", user.username),
            None => log::info!("no active session, continuing anonymous"),
        }
        session
    }

    /// Spawn [`Bootstrapper::run`] on the browser's local executor.
    pub fn spawn(self) {
        crate::app::spawn_ui(async move {
            self.run().await;
        });
    }
}
