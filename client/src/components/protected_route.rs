//! Route wrapper that renders its children only for signed-in users with
//! the project context the route needs.
//!
//! SYSTEM CONTEXT
//! ==============
//! Decisions come from `util::route_gate`; this component only feeds it
//! reactive inputs and performs the resulting navigation. Permission flips
//! are debounced before the gate sees them so intermediate render states
//! during navigation cannot trigger a redirect.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::AppSession;
use crate::state::auth::AuthState;
use crate::util::route_gate::{Debouncer, GateConfig, GateOutcome, RouteGate};

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = expect_context::<AppSession>();
    let config = expect_context::<GateConfig>();
    let location = use_location();
    let pathname = location.pathname;
    let search = location.search;
    let navigate = use_navigate();

    let gate = StoredValue::new(RouteGate::new(config.clone()));
    let debouncer = StoredValue::new(Debouncer::<bool>::default());
    let outcome = RwSignal::new(GateOutcome::Loading);

    let apply = move |allowed: bool| {
        let state = auth.get_untracked();
        let path = pathname.get_untracked();
        let mut decided = GateOutcome::Loading;
        gate.update_value(|g| decided = g.decide(&state, &path, allowed));

        let replace = NavigateOptions { replace: true, ..NavigateOptions::default() };
        match &decided {
            GateOutcome::RedirectToEntry { from } => {
                let query = search.get_untracked();
                let query = query.trim_start_matches('?');
                let from = if query.is_empty() { from.clone() } else { format!("{from}?{query}") };
                let url = gate.with_value(|g| g.entry_redirect_url(&from));
                navigate(&url, replace);
            }
            GateOutcome::RedirectToProjectSelection => {
                leptos::logging::log!("no project selected for {path}; redirecting");
                let route = gate.with_value(|g| g.config().project_selection_route.clone());
                navigate(&route, replace);
            }
            GateOutcome::Loading | GateOutcome::Render => {}
        }
        if outcome.get_untracked() != decided {
            outcome.set(decided);
        }
    };

    Effect::new(move || {
        // Tracked inputs: auth transitions and navigation.
        let _ = auth.get();
        let path = pathname.get();

        // Untracked: selection writers must also navigate or change auth for
        // the gate to re-evaluate.
        let selected = session.active_selected_project();
        let allowed = config.access.evaluate(&path, selected.as_deref()).allowed;
        let mut ticket = 0;
        debouncer.update_value(|d| ticket = d.push(allowed));

        let apply = apply.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let delay = crate::util::route_gate::ROUTE_PERMISSION_DEBOUNCE_MS;
            gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(delay))).await;
            let mut settled = None;
            debouncer.update_value(|d| settled = d.settle(ticket));
            if let Some(allowed) = settled {
                apply(allowed);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let mut settled = None;
            debouncer.update_value(|d| settled = d.settle(ticket));
            if let Some(allowed) = settled {
                apply(allowed);
            }
        }
    });

    move || match outcome.get() {
        GateOutcome::Render => children().into_any(),
        GateOutcome::Loading => view! { <div class="route-gate__loading">"Loading..."</div> }.into_any(),
        GateOutcome::RedirectToEntry { .. } | GateOutcome::RedirectToProjectSelection => ().into_any(),
    }
}
