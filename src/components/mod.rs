//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session from the `RwSignal<Session>` context and reach
//! the store through [`crate::app::use_session_store`].

pub mod form_field;
pub mod guarded;
pub mod header;
