//! Route access decisions from session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route applies the same rule, so the decision is a pure function the
//! `Guarded` component evaluates reactively. Nothing is trusted until the
//! startup session check has settled.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::{Session, SessionStatus};

/// Routable views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Home,
    Login,
    Signup,
}

impl View {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
        }
    }
}

/// What a route needs from the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthRequirement {
    /// Visible to everyone once the session is known.
    #[default]
    Any,
    /// Only for signed-out users (login, signup).
    AnonymousOnly,
    /// Only for signed-in users.
    Authenticated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectTo(View),
    ShowPlaceholder,
}

pub fn decide(session: &Session, requirement: AuthRequirement) -> GuardDecision {
    if session.status() != SessionStatus::Ready {
        return GuardDecision::ShowPlaceholder;
    }
    match (requirement, session.is_authenticated()) {
        (AuthRequirement::AnonymousOnly, true) => GuardDecision::RedirectTo(View::Home),
        (AuthRequirement::Authenticated, false) => GuardDecision::RedirectTo(View::Login),
        _ => GuardDecision::Allow,
    }
}
