//! Entry page: email/password sign-in and GitHub OAuth.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes send signed-out visitors here with `?next=<path>`. A
//! successful sign-in resumes that path, or lands on project selection.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::app::AppSession;
use crate::config::ClientConfig;
use crate::state::auth::AuthState;
use crate::util::identity::{SignalTeardown, switch_identity};
use crate::util::route_gate::{NEXT_PARAM, resume_target};
use crate::util::validation::LoginForm;

/// Where a successful sign-in lands when no `next` target was carried.
pub const DEFAULT_LANDING: &str = "/projects";

/// GitHub OAuth start URL on the backend.
pub fn github_oauth_url(config: &ClientConfig) -> String {
    config.api_url("/auth/github")
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let teardown = expect_context::<SignalTeardown>();
    let config = expect_context::<ClientConfig>();
    let query = use_query_map();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Already signed in: skip the form.
    let navigate_signed_in = navigate.clone();
    Effect::new(move || {
        let state = auth.get();
        if state.initialized() && state.user_id().is_some() && !busy.get_untracked() {
            let next = query.with_untracked(|q| q.get(NEXT_PARAM));
            navigate_signed_in(&resume_target(next.as_deref(), DEFAULT_LANDING), NavigateOptions::default());
        }
    });

    let oauth_url = github_oauth_url(&config);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match LoginForm::validate(&email.get(), &password.get()) {
            Ok(form) => form,
            Err(e) => {
                info.set(e.to_string());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        let target = resume_target(query.with_untracked(|q| q.get(NEXT_PARAM)).as_deref(), DEFAULT_LANDING);
        let session = session.clone();
        let config = config.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::login(&config, &form.email, &form.password).await {
                Ok(bundle) => {
                    let mut teardown = teardown;
                    let switch = switch_identity(&session, &mut teardown, &bundle);
                    leptos::logging::log!("signed in as {}", switch.user_id);
                    info.set(String::new());
                    busy.set(false);
                    navigate(&target, NavigateOptions::default());
                }
                Err(e) => {
                    leptos::logging::warn!("sign-in failed: {e}");
                    info.set(e.user_message());
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"DevHive"</h1>
                <p class="login-card__subtitle">"Sign in to your workspace"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">"Or"</p>
                <a href=oauth_url class="login-button" rel="external">
                    "Sign in with GitHub"
                </a>
                <p class="login-card__footer">
                    "New here? "
                    <a href="/register">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
