//! Root application component with routing and context providers.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::bootstrap::Bootstrapper;
use crate::components::guarded::Guarded;
use crate::components::header::Header;
use crate::config::ClientConfig;
use crate::net::browser::BrowserClient;
use crate::net::transport::Transport;
use crate::pages::{home::HomePage, login::LoginPage, signup::SignupPage};
use crate::state::session::{Session, SessionEvent, SessionStore};
use crate::util::guard::{AuthRequirement, View};

/// Context handle for the session store. The store is `!Send`, so it lives
/// in local storage and components copy the handle around.
pub type StoreHandle = StoredValue<SessionStore, LocalStorage>;

const EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session store, mirrors it into a reactive signal, starts the
/// one-time session check, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let transport = Rc::new(Transport::new(ClientConfig::default(), Rc::new(BrowserClient)));
    let store = SessionStore::new(transport);

    let session = RwSignal::new(store.session());
    store
        .subscribe(move |event| match event {
            SessionEvent::Changed(next) => session.set(next.clone()),
            SessionEvent::Expired => on_session_expired(),
        })
        .detach();

    provide_context(session);
    provide_context::<StoreHandle>(StoredValue::new_local(store.clone()));

    Bootstrapper::new(store).spawn();

    view! {
        <Stylesheet id="leptos" href="/pkg/authgate.css"/>
        <Title text="Cookie Session App"/>

        <Router>
            <div class="app">
                <Header/>
                <main class="container">
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route
                            path=StaticSegment("")
                            view=|| view! { <Guarded requirement=AuthRequirement::Any><HomePage/></Guarded> }
                        />
                        <Route
                            path=StaticSegment("login")
                            view=|| view! { <Guarded requirement=AuthRequirement::AnonymousOnly><LoginPage/></Guarded> }
                        />
                        <Route
                            path=StaticSegment("signup")
                            view=|| view! { <Guarded requirement=AuthRequirement::AnonymousOnly><SignupPage/></Guarded> }
                        />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}

/// The session signal provided by [`App`].
pub fn use_session() -> RwSignal<Session> {
    expect_context::<RwSignal<Session>>()
}

/// The store handle provided by [`App`].
pub fn use_session_store() -> StoreHandle {
    expect_context::<StoreHandle>()
}

/// Run a UI task on the browser's local executor. Server renders drop it.
pub fn spawn_ui(task: impl Future<Output = ()> + 'static) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(task);
    #[cfg(not(feature = "hydrate"))]
    drop(task);
}

/// Tell the user and fall back to the home view with a full reload, which
/// also drops any page state built for the expired user.
fn on_session_expired() {
    log::warn!("session expired, returning to {}", View::Home.path());
    #[cfg(feature = "hydrate")]
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(EXPIRED_NOTICE);
        let _ = window.location().set_href(View::Home.path());
    }
    #[cfg(not(feature = "hydrate"))]
    log::debug!("{EXPIRED_NOTICE}");
}
