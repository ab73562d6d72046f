//! Client-side state: the session store and route-scoped page data.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` is the single source of truth for who is signed in. Page state
//! modules only read it and never mutate it directly.

pub mod home;
pub mod session;
