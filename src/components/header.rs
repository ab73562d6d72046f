//! Top bar: greeting plus logout when signed in, auth links otherwise.

use leptos::prelude::*;

use crate::app::{spawn_ui, use_session, use_session_store};
use crate::state::session::Session;
use crate::util::guard::View;

#[component]
pub fn Header() -> impl IntoView {
    let session = use_session();
    let store = use_session_store();

    let on_logout = move |_| {
        if !confirm_logout() {
            return;
        }
        let store = store.get_value();
        spawn_ui(async move { store.logout().await });
    };

    let display_name = move || session.with(|s| s.user().map(|u| u.name.clone()).unwrap_or_default());

    view! {
        <header class="header">
            <div class="header-content">
                <a href={View::Home.path()} class="logo">"Cookie Session App"</a>
                <nav class="nav">
                    <Show
                        when=move || session.with(Session::is_authenticated)
                        fallback=move || {
                            session.with(Session::is_ready).then(|| view! {
                                <div class="auth-links">
                                    <a href={View::Login.path()} class="btn btn-primary">"Log in"</a>
                                    <a href={View::Signup.path()} class="btn btn-secondary">"Sign up"</a>
                                </div>
                            })
                        }
                    >
                        <div class="user-info">
                            <span class="user-name">"Hello, " {display_name} "!"</span>
                            <button class="btn btn-danger" on:click=on_logout>"Log out"</button>
                        </div>
                    </Show>
                </nav>
            </div>
        </header>
    }
}

fn confirm_logout() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().is_some_and(|w| w.confirm_with_message("Log out now?").unwrap_or(false))
    }
    #[cfg(not(feature = "hydrate"))]
    true
}
