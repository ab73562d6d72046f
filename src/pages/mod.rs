//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its form or fetch orchestration and delegates shared
//! rendering to `components`. Route gating lives in
//! [`crate::components::guarded::Guarded`], not in the pages.

pub mod home;
pub mod login;
pub mod signup;

use leptos::prelude::*;

use crate::net::error::ApiError;
use crate::util::validation::FieldErrors;

/// Route a failed request either to per-field messages or the page banner.
pub(crate) fn show_api_error(err: ApiError, fields: RwSignal<FieldErrors>, banner: RwSignal<String>) {
    if err.has_field_errors() {
        fields.set(FieldErrors::from(err.field_errors));
    } else {
        banner.set(err.message);
    }
}
