//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetching through the query
//! cache, identity changes, navigation) and leaves access control to
//! `components::protected_route`.

pub mod login;
pub mod messages;
pub mod oauth_callback;
pub mod project_section;
pub mod projects;
pub mod register;

use leptos::prelude::*;

use crate::app::AppSession;
use crate::config::ClientConfig;
use crate::net::api::ApiError;
use crate::util::auth::refresh_session;
use crate::util::identity::SignalTeardown;

/// Context handles a page needs to talk to the backend from async tasks.
#[derive(Clone)]
pub(crate) struct Backend {
    pub session: AppSession,
    pub config: ClientConfig,
    pub teardown: SignalTeardown,
}

impl Backend {
    /// Capture the handles from context. Call during component setup, not
    /// inside spawned tasks.
    pub fn from_context() -> Self {
        Self {
            session: expect_context::<AppSession>(),
            config: expect_context::<ClientConfig>(),
            teardown: expect_context::<SignalTeardown>(),
        }
    }

    /// Surface `e` inline and, when the backend rejected the token,
    /// re-validate the session so the route gate can react.
    pub fn report(&self, e: &ApiError, error: RwSignal<Option<String>>) {
        leptos::logging::warn!("request failed: {e}");
        error.set(Some(e.user_message()));
        if e.is_unauthorized() {
            refresh_session(self.teardown, self.session.clone(), self.config.clone());
        }
    }
}
