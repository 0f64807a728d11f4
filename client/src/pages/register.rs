//! Account registration page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppSession;
use crate::config::ClientConfig;
use crate::pages::login::DEFAULT_LANDING;
use crate::util::identity::{SignalTeardown, switch_identity};
use crate::util::validation::{PASSWORD_MIN_LEN, RegisterForm};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let teardown = expect_context::<SignalTeardown>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = match RegisterForm::validate(&username.get(), &email.get(), &password.get(), &confirmation.get()) {
            Ok(form) => form,
            Err(e) => {
                info.set(e.to_string());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        let session = session.clone();
        let config = config.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::register(&config, &form.username, &form.email, &form.password).await {
                Ok(bundle) => {
                    let mut teardown = teardown;
                    switch_identity(&session, &mut teardown, &bundle);
                    busy.set(false);
                    navigate(DEFAULT_LANDING, NavigateOptions::default());
                }
                Err(e) => {
                    leptos::logging::warn!("registration failed: {e}");
                    info.set(e.user_message());
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create your account"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
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
                        placeholder=format!("Password ({PASSWORD_MIN_LEN}+ characters)")
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Confirm password"
                        prop:value=move || confirmation.get()
                        on:input=move |ev| confirmation.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already have an account? "
                    <a href="/">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
