//! Pure helpers shared by pages and components.

pub mod guard;
pub mod validation;
