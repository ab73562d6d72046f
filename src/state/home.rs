//! Home page data: `/home` and `/public/info`, fetched together.
//!
//! The two requests have no ordering dependency and are issued concurrently.
//! The view is ready only when both succeed; either failure is reported as
//! one error. Results that land after the page was torn down are dropped via
//! [`Liveness`].

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::net::api::AuthApi;
use crate::net::types::{HomeData, PublicInfo};

const LOAD_FAILED: &str = "Could not load data. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeView {
    pub home: HomeData,
    pub public: PublicInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HomeState {
    #[default]
    Loading,
    Loaded(HomeView),
    Failed(String),
}

/// Disposal flag shared between a view and its outstanding fetches.
///
/// Atomic so the view can flip it from a `Send` cleanup callback.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fetch both payloads concurrently.
///
/// # Errors
///
/// Returns the first [`ApiError`](crate::net::error::ApiError) from either request.
pub async fn load_home(api: &AuthApi) -> Result<HomeView, crate::net::error::ApiError> {
    let (home, public) = futures::try_join!(api.home(), api.public_info())?;
    Ok(HomeView { home, public })
}

/// Load and hand the outcome to `apply`, unless `liveness` was disposed
/// while the requests were outstanding.
pub async fn load_into(api: &AuthApi, liveness: &Liveness, apply: impl FnOnce(HomeState)) {
    let state = match load_home(api).await {
        Ok(view) => HomeState::Loaded(view),
        Err(err) => {
            log::warn!("home data load failed: {err}");
            HomeState::Failed(if err.message.is_empty() { LOAD_FAILED.to_owned() } else { err.message })
        }
    };
    if liveness.is_live() {
        apply(state);
    } else {
        log::debug!("home view disposed, discarding load result");
    }
}
