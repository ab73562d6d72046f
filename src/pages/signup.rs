//! Account registration.
//!
//! The form is checked locally first, then re-validated by the server, whose
//! per-field messages replace the local ones. A successful signup shows a
//! confirmation and moves to the login view after a short delay.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::{spawn_ui, use_session_store};
use crate::components::form_field::FormField;
use crate::pages::show_api_error;
use crate::util::guard::View;
use crate::util::validation::{FieldErrors, SignupForm};

const REDIRECT_DELAY_MS: u32 = 2_000;

#[component]
pub fn SignupPage() -> impl IntoView {
    let store = use_session_store();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let banner = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let success = RwSignal::new(None::<String>);

    // Leave for the login view once the confirmation has been shown.
    Effect::new(move || {
        if success.with(Option::is_none) {
            return;
        }
        let navigate = navigate.clone();
        spawn_ui(async move {
            #[cfg(feature = "hydrate")]
            gloo_timers::future::TimeoutFuture::new(REDIRECT_DELAY_MS).await;
            navigate(View::Login.path(), NavigateOptions::default());
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = SignupForm {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
            name: name.get_untracked(),
        };
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::new());
        banner.set(String::new());
        busy.set(true);

        let store = store.get_value();
        spawn_ui(async move {
            match store.signup(&payload).await {
                Ok(message) => success.set(Some(message)),
                Err(err) => {
                    log::info!("signup rejected: {err}");
                    show_api_error(err, errors, banner);
                }
            }
            busy.set(false);
        });
    };

    view! {
        <div class="form-container">
            <h2 class="form-title">"Sign up"</h2>
            <Show
                when=move || success.with(Option::is_none)
                fallback=move || view! {
                    <div class="alert alert-success">
                        <p>{move || success.get().unwrap_or_default()}</p>
                        <p>{format!("Redirecting to the login page in {} seconds...", REDIRECT_DELAY_MS / 1_000)}</p>
                    </div>
                }
            >
                <Show when=move || !banner.get().is_empty()>
                    <div class="alert alert-error">{move || banner.get()}</div>
                </Show>
                <form on:submit=on_submit>
                    <FormField
                        label="Username"
                        name="username"
                        value=username
                        errors=errors
                        busy=busy
                        placeholder="3-20 characters"
                        autocomplete="username"
                    />
                    <FormField
                        label="Email"
                        name="email"
                        kind="email"
                        value=email
                        errors=errors
                        busy=busy
                        placeholder="you@example.com"
                        autocomplete="email"
                    />
                    <FormField
                        label="Name"
                        name="name"
                        value=name
                        errors=errors
                        busy=busy
                        placeholder="Up to 20 characters"
                        autocomplete="name"
                    />
                    <FormField
                        label="Password"
                        name="password"
                        kind="password"
                        value=password
                        errors=errors
                        busy=busy
                        placeholder="6-40 characters"
                        autocomplete="new-password"
                    />
                    <FormField
                        label="Confirm password"
                        name="confirm_password"
                        kind="password"
                        value=confirm_password
                        errors=errors
                        busy=busy
                        placeholder="Repeat the password"
                        autocomplete="new-password"
                    />
                    <button type="submit" class="btn btn-primary btn-block" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing up..." } else { "Sign up" }}
                    </button>
                </form>
                <p class="form-footer">
                    "Already have an account? " <a href={View::Login.path()}>"Log in"</a>
                </p>
            </Show>
        </div>
    }
}
