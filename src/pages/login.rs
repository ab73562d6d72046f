//! Username + password sign-in.
//!
//! On success the store flips to authenticated and the route guard moves the
//! user off this page; nothing here navigates directly.

use leptos::prelude::*;

use crate::app::{spawn_ui, use_session_store};
use crate::components::form_field::FormField;
use crate::pages::show_api_error;
use crate::util::guard::View;
use crate::util::validation::{FieldErrors, LoginForm};

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = use_session_store();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let banner = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = LoginForm { username: username.get_untracked(), password: password.get_untracked() };
        let credentials = match form.validate() {
            Ok(credentials) => credentials,
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
            if let Err(err) = store.login(&credentials).await {
                log::info!("login rejected: {err}");
                show_api_error(err, errors, banner);
            }
            busy.set(false);
        });
    };

    view! {
        <div class="form-container">
            <h2 class="form-title">"Log in"</h2>
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
                    placeholder="Enter your username"
                    autocomplete="username"
                />
                <FormField
                    label="Password"
                    name="password"
                    kind="password"
                    value=password
                    errors=errors
                    busy=busy
                    placeholder="Enter your password"
                    autocomplete="current-password"
                />
                <button type="submit" class="btn btn-primary btn-block" disabled=move || busy.get()>
                    {move || if busy.get() { "Logging in..." } else { "Log in" }}
                </button>
            </form>
            <p class="form-footer">
                "No account yet? " <a href={View::Signup.path()}>"Sign up"</a>
            </p>
        </div>
    }
}
