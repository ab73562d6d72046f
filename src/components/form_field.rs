//! Labelled text input bound to a signal, with its inline validation message.

use leptos::prelude::*;

use crate::util::validation::FieldErrors;

/// One form row. Editing the input clears that field's message.
#[component]
pub fn FormField(
    label: &'static str,
    name: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<FieldErrors>,
    busy: RwSignal<bool>,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional)] autocomplete: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-group">
            <label for=name class="form-label">{label}</label>
            <input
                id=name
                name=name
                type=kind
                class="form-input"
                class:invalid=move || errors.with(|e| e.get(name).is_some())
                placeholder=placeholder
                autocomplete=autocomplete
                prop:value=move || value.get()
                on:input=move |ev| {
                    value.set(event_target_value(&ev));
                    errors.update(|e| e.clear(name));
                }
                disabled=move || busy.get()
            />
            <FieldError errors=errors field=name/>
        </div>
    }
}

#[component]
pub fn FieldError(errors: RwSignal<FieldErrors>, field: &'static str) -> impl IntoView {
    move || {
        errors
            .with(|e| e.get(field).map(str::to_owned))
            .map(|message| view! { <div class="form-error">{message}</div> })
    }
}
