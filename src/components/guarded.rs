//! Route wrapper that applies [`decide`] to the current session.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::use_session;
use crate::util::guard::{AuthRequirement, GuardDecision, decide};

/// Render `children` only when the session satisfies `requirement`.
///
/// While the session is still being established a placeholder is shown.
/// Redirects replace the current history entry so the back button does not
/// bounce the user into the guard again.
#[component]
pub fn Guarded(requirement: AuthRequirement, children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let decision = Memo::new(move |_| session.with(|s| decide(s, requirement)));

    Effect::new(move || {
        if let GuardDecision::RedirectTo(view) = decision.get() {
            navigate(view.path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Allow
            fallback=move || view! { <div class="loading">{placeholder_text(decision.get())}</div> }
        >
            {children()}
        </Show>
    }
}

fn placeholder_text(decision: GuardDecision) -> &'static str {
    match decision {
        GuardDecision::RedirectTo(_) => "Redirecting...",
        GuardDecision::Allow | GuardDecision::ShowPlaceholder => "Loading...",
    }
}
