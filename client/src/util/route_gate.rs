//! Per-navigation access decision for protected routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! `components::protected_route` feeds this module the auth state, the
//! current path, and the debounced permission result, then acts on the
//! returned [`GateOutcome`]. Keeping the decision here keeps it testable
//! without a reactive runtime.
//!
//! DESIGN
//! ======
//! Project redirects are edge-triggered: the gate remembers the last
//! permission it saw and only redirects on an allowed -> denied transition.
//! Intermediate render states can briefly report "denied"; reacting to every
//! evaluation would bounce the user to `/projects` mid-navigation.

#[cfg(test)]
#[path = "route_gate_test.rs"]
mod route_gate_test;

use crate::state::auth::AuthState;
use crate::util::route_access::RouteAccess;

/// Delay before a permission flip is believed.
pub const ROUTE_PERMISSION_DEBOUNCE_MS: u32 = 50;

/// Query parameter carrying the originally requested path to the entry route.
pub const NEXT_PARAM: &str = "next";

/// Route layout the gate redirects between.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    pub entry_route: String,
    pub project_selection_route: String,
    pub access: RouteAccess,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            entry_route: "/".to_owned(),
            project_selection_route: "/projects".to_owned(),
            access: RouteAccess::default(),
        }
    }
}

/// What the protected route should do for the current navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Auth is still resolving; render the placeholder, redirect nothing.
    Loading,
    /// No user. `from` is the path to resume after sign-in.
    RedirectToEntry { from: String },
    RedirectToProjectSelection,
    Render,
}

/// Edge-triggered gate. One instance lives per mounted protected route.
#[derive(Clone, Debug)]
pub struct RouteGate {
    config: GateConfig,
    last_allowed: bool,
}

impl RouteGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config, last_allowed: true }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Permission seen on the previous scoped evaluation.
    pub fn last_allowed(&self) -> bool {
        self.last_allowed
    }

    /// Decide the outcome for `path`. `allowed` is the debounced output of
    /// [`RouteAccess::evaluate`] for that path.
    pub fn decide(&mut self, auth: &AuthState, path: &str, allowed: bool) -> GateOutcome {
        if auth.is_deferred() {
            return GateOutcome::Loading;
        }
        if auth.user_id().is_none() {
            return GateOutcome::RedirectToEntry { from: path.to_owned() };
        }
        if !self.config.access.is_project_scoped(path) {
            return GateOutcome::Render;
        }

        let previously_allowed = self.last_allowed;
        self.last_allowed = allowed;
        if !allowed && previously_allowed {
            return GateOutcome::RedirectToProjectSelection;
        }
        GateOutcome::Render
    }

    /// Entry route URL carrying `from` for post-login resumption.
    pub fn entry_redirect_url(&self, from: &str) -> String {
        entry_redirect_url(&self.config.entry_route, from)
    }
}

/// `entry` with `from` attached as the `next` query parameter. The entry
/// route itself is never carried.
pub fn entry_redirect_url(entry: &str, from: &str) -> String {
    if from.is_empty() || from == entry {
        return entry.to_owned();
    }
    format!("{entry}?{NEXT_PARAM}={}", urlencoding::encode(from))
}

/// Where to go after a successful sign-in: the carried `next` path when it
/// is a same-origin relative path, otherwise `fallback`.
pub fn resume_target(next: Option<&str>, fallback: &str) -> String {
    match next {
        Some(path) if is_local_path(path) => path.to_owned(),
        _ => fallback.to_owned(),
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Generation-counter debouncer: a pushed value only settles if nothing
/// newer was pushed before its delay elapsed.
#[derive(Clone, Debug, Default)]
pub struct Debouncer<T> {
    generation: u64,
    pending: Option<T>,
}

impl<T: Clone> Debouncer<T> {
    /// Record `value`; returns the ticket to settle after the delay.
    pub fn push(&mut self, value: T) -> u64 {
        self.generation += 1;
        self.pending = Some(value);
        self.generation
    }

    /// The value for `ticket` if it is still the newest, else `None`.
    pub fn settle(&mut self, ticket: u64) -> Option<T> {
        if ticket != self.generation {
            return None;
        }
        self.pending.take()
    }
}
