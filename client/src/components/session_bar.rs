//! Top navigation bar with the signed-in user's sign-out action.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::AppSession;
use crate::config::ClientConfig;
use crate::state::auth::AuthState;
use crate::util::identity::{SignalTeardown, sign_out};

#[component]
pub fn SessionBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let teardown = expect_context::<SignalTeardown>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let signed_in = move || auth.with(|a| a.user_id().is_some());
    let has_project = {
        let session = session.clone();
        move || {
            let _ = auth.get();
            session.active_selected_project().is_some()
        }
    };

    let on_sign_out = move |_| {
        let token = session.token();
        let mut teardown = teardown;
        if let Some(user) = sign_out(&session, &mut teardown) {
            leptos::logging::log!("signed out {user}");
        }

        #[cfg(feature = "hydrate")]
        if let Some(token) = token {
            let config = config.clone();
            leptos::task::spawn_local(async move {
                crate::net::api::logout(&config, &token).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (token, &config);

        navigate("/", leptos_router::NavigateOptions::default());
    };

    view! {
        <header class="session-bar" class:session-bar--hidden=move || !signed_in()>
            <a class="session-bar__brand" href="/projects">"DevHive"</a>
            <nav class="session-bar__nav">
                <a href="/projects">"Projects"</a>
                <span class="session-bar__project-links" class:session-bar--hidden=move || !has_project()>
                    <a href="/project">"Overview"</a>
                    <a href="/board">"Board"</a>
                    <a href="/backlog">"Backlog"</a>
                    <a href="/sprint">"Sprint"</a>
                    <a href="/contacts">"Contacts"</a>
                    <a href="/messages">"Messages"</a>
                </span>
            </nav>
            <button class="btn session-bar__sign-out" on:click=on_sign_out>
                "Sign out"
            </button>
        </header>
    }
}
