//! Identity switch and sign-out teardown.
//!
//! SYSTEM CONTEXT
//! ==============
//! Called when a new identity arrives (OAuth callback, password sign-in,
//! registration) and on sign-out. Whatever belonged to the outgoing user is
//! torn down before the incoming user is committed, so no request for the
//! new user can race a stale socket or stale cached results.
//!
//! Order: close realtime connection -> clear the outgoing user's project
//! selection -> clear cached results -> commit session -> commit auth.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use leptos::prelude::{RwSignal, Update};

use crate::net::message_stream::{CloseReason, RealtimeLink};
use crate::net::types::TokenBundle;
use crate::state::auth::AuthState;
use crate::state::cache::QueryCache;
use crate::state::chat::ChatState;
use crate::state::session::SessionStore;
use crate::util::storage::KeyValueStore;

/// The live state an identity change has to reach besides the session store.
pub trait IdentityTeardown {
    /// Close the realtime connection, if one is open.
    fn close_realtime(&mut self, reason: CloseReason);
    /// Drop every cached query result.
    fn clear_cached_results(&mut self);
    /// Publish the committed identity (`None` after sign-out).
    fn commit_auth(&mut self, user_id: Option<&str>);
}

/// What an identity switch replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentitySwitch {
    pub previous_user_id: Option<String>,
    pub user_id: String,
}

impl IdentitySwitch {
    pub fn changed_user(&self) -> bool {
        self.previous_user_id.as_deref() != Some(self.user_id.as_str())
    }
}

/// Establish `bundle` as the active identity, tearing down the previous one.
///
/// The outgoing user's project selection is cleared only when the user
/// actually changes; the incoming user's own selection is never touched.
pub fn switch_identity<S, T>(session: &SessionStore<S>, teardown: &mut T, bundle: &TokenBundle) -> IdentitySwitch
where
    S: KeyValueStore,
    T: IdentityTeardown + ?Sized,
{
    let previous_user_id = session.user_id();

    if previous_user_id.is_some() {
        teardown.close_realtime(CloseReason::IDENTITY_SWITCH);
    }
    if let Some(previous) = previous_user_id.as_deref().filter(|prev| *prev != bundle.user_id) {
        session.clear_selected_project(previous);
    }
    teardown.clear_cached_results();

    session.set_token(&bundle.token);
    session.set_user_id(&bundle.user_id);
    teardown.commit_auth(Some(&bundle.user_id));

    IdentitySwitch {
        previous_user_id,
        user_id: bundle.user_id.clone(),
    }
}

/// Sign the current user out locally. Returns the user that was signed out.
pub fn sign_out<S, T>(session: &SessionStore<S>, teardown: &mut T) -> Option<String>
where
    S: KeyValueStore,
    T: IdentityTeardown + ?Sized,
{
    let previous_user_id = session.user_id();
    teardown.close_realtime(CloseReason::LOGOUT);
    teardown.clear_cached_results();
    session.clear_auth();
    teardown.commit_auth(None);
    previous_user_id
}

/// [`IdentityTeardown`] over the app's reactive contexts.
#[derive(Clone, Copy, Debug)]
pub struct SignalTeardown {
    pub auth: RwSignal<AuthState>,
    pub cache: RwSignal<QueryCache>,
    pub chat: RwSignal<ChatState>,
    pub realtime: RwSignal<RealtimeLink>,
}

impl IdentityTeardown for SignalTeardown {
    fn close_realtime(&mut self, reason: CloseReason) {
        self.realtime.update(|link| {
            link.close(reason);
        });
    }

    fn clear_cached_results(&mut self) {
        self.cache.update(QueryCache::clear);
        self.chat.update(ChatState::clear);
    }

    fn commit_auth(&mut self, user_id: Option<&str>) {
        self.auth.update(|auth| match user_id {
            Some(id) => auth.switch_identity(id),
            None => {
                if let Err(e) = auth.logout() {
                    leptos::logging::warn!("sign-out without active user: {e}");
                }
            }
        });
    }
}
