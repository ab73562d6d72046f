//! Landing page: `/home` and `/public/info` side by side.
//!
//! Data is fetched on mount and again whenever the signed-in user changes.
//! Results that arrive after the page is torn down are discarded.

use leptos::prelude::*;

use crate::app::{spawn_ui, use_session, use_session_store};
use crate::net::types::{HomeData, PublicInfo};
use crate::state::home::{HomeState, Liveness, load_into};

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();
    let store = use_session_store();
    let state = RwSignal::new(HomeState::Loading);

    let liveness = Liveness::new();
    let cleanup_liveness = liveness.clone();
    on_cleanup(move || cleanup_liveness.dispose());
    let liveness = StoredValue::new(liveness);
    // Only the most recent load may publish; older ones are superseded.
    let generation = StoredValue::new(0_u64);

    let reload = move || {
        state.set(HomeState::Loading);
        generation.update_value(|g| *g += 1);
        let issued = generation.get_value();
        let api = store.with_value(|s| s.api().clone());
        let liveness = liveness.get_value();
        spawn_ui(async move {
            load_into(&api, &liveness, |next| {
                if generation.get_value() == issued {
                    state.set(next);
                }
            })
            .await;
        });
    };

    let viewer = Memo::new(move |_| session.with(|s| s.user().map(|u| u.username.clone())));
    Effect::new(move || {
        viewer.track();
        reload();
    });

    view! {
        <div class="home-container">
            <section class="welcome-message">
                <h1>"Cookie session demo"</h1>
                <p>"Your session lives in an HttpOnly cookie that page scripts cannot read."</p>
            </section>
            {move || match state.get() {
                HomeState::Loading => view! { <div class="loading">"Loading data..."</div> }.into_any(),
                HomeState::Failed(message) => view! {
                    <div class="alert alert-error">
                        <p>{message}</p>
                        <button class="btn btn-primary" on:click=move |_| reload()>"Retry"</button>
                    </div>
                }
                .into_any(),
                HomeState::Loaded(data) => view! {
                    <HomePanel home=data.home/>
                    <PublicPanel info=data.public/>
                }
                .into_any(),
            }}
            <section class="info-box">
                <h3>"How this session works"</h3>
                <ul>
                    <li>"The session cookie is HttpOnly, so injected scripts cannot steal it."</li>
                    <li>"The cookie is sent automatically with every request to the API."</li>
                    <li>"Request payloads are stripped of markup before they leave the page."</li>
                    <li>"When the server reports an expired session you are signed out everywhere."</li>
                </ul>
            </section>
        </div>
    }
}

#[component]
fn HomePanel(home: HomeData) -> impl IntoView {
    let greeting = if home.message.is_empty() {
        "Welcome!".to_owned()
    } else {
        home.message
    };
    view! {
        <section class="home-card">
            <h2>{greeting}</h2>
            {match home.user {
                Some(user) if home.authenticated => view! {
                    <dl class="user-details">
                        <dt>"Username"</dt><dd>{user.username}</dd>
                        <dt>"Name"</dt><dd>{user.name}</dd>
                        <dt>"Role"</dt><dd>{user.role}</dd>
                    </dl>
                }
                .into_any(),
                _ => view! {
                    <p>"You are browsing anonymously. Log in to see your account details."</p>
                }
                .into_any(),
            }}
        </section>
    }
}

#[component]
fn PublicPanel(info: PublicInfo) -> impl IntoView {
    view! {
        <section class="home-card home-card--public">
            <h3>"Public endpoint"</h3>
            <p>{info.message}</p>
            <p class="timestamp">"Server time: " {format_timestamp(info.timestamp)}</p>
        </section>
    }
}

/// Render epoch milliseconds in the browser's locale.
fn format_timestamp(millis: i64) -> String {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_precision_loss)]
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(millis as f64));
        String::from(date.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED))
    }
    #[cfg(not(feature = "hydrate"))]
    format!("{millis} ms since epoch")
}
