//! OAuth callback landing page.
//!
//! Reads the token bundle from the URL fragment, switches identity and
//! replaces the history entry so the bundle does not linger in history.
//! Failures are shown briefly before returning to the entry route.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppSession;
use crate::util::identity::{SignalTeardown, switch_identity};
use crate::util::oauth::{OAUTH_ERROR_REDIRECT_MS, OAUTH_SUCCESS_ROUTE, parse_callback_fragment};

#[component]
pub fn OAuthCallbackPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let teardown = expect_context::<SignalTeardown>();
    let navigate = use_navigate();
    let error = RwSignal::new(None::<&'static str>);
    let handled = StoredValue::new(false);

    Effect::new(move || {
        if handled.get_value() {
            return;
        }
        handled.set_value(true);

        let replace = NavigateOptions { replace: true, ..NavigateOptions::default() };
        match parse_callback_fragment(&current_fragment()) {
            Ok(bundle) => {
                let mut teardown = teardown;
                let switch = switch_identity(&session, &mut teardown, &bundle);
                leptos::logging::log!("oauth sign-in completed for {}", switch.user_id);
                navigate(OAUTH_SUCCESS_ROUTE, replace);
            }
            Err(e) => {
                leptos::logging::warn!("oauth callback rejected: {e}");
                error.set(Some(e.user_message()));
                let navigate = navigate.clone();
                #[cfg(feature = "hydrate")]
                leptos::task::spawn_local(async move {
                    gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(OAUTH_ERROR_REDIRECT_MS)))
                        .await;
                    navigate("/", replace);
                });
                #[cfg(not(feature = "hydrate"))]
                let _ = (navigate, replace, OAUTH_ERROR_REDIRECT_MS);
            }
        }
    });

    view! {
        <div class="login-page">
            <div class="login-card">
                {move || match error.get() {
                    Some(message) => view! { <p class="login-message login-message--error">{message}</p> }.into_any(),
                    None => view! { <p class="login-message">"Completing sign-in..."</p> }.into_any(),
                }}
            </div>
        </div>
    }
}

fn current_fragment() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}
