//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app root runs the startup auth check once per page load; pages that
//! establish an identity go through `util::identity` instead. A request
//! rejected mid-session triggers a refresh that re-validates the token.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::net::api::ApiError;
use crate::net::message_stream::CloseReason;
use crate::state::auth::{AuthPhase, AuthState};
use crate::state::session::SessionStore;
use crate::util::identity::{IdentityTeardown, SignalTeardown};
use crate::util::storage::KeyValueStore;

/// Reconcile the stored session with the startup validation result.
///
/// A validated user id replaces a stale stored one. Rejected credentials
/// are forgotten; transient failures keep the token for the next load.
pub fn persist_startup_result<S: KeyValueStore>(session: &SessionStore<S>, result: &Result<String, ApiError>) {
    match result {
        Ok(user_id) => {
            if session.user_id().as_deref() != Some(user_id.as_str()) {
                session.set_user_id(user_id);
            }
        }
        Err(e) if e.is_unauthorized() => session.clear_auth(),
        Err(_) => {}
    }
}

/// Start the auth check: `Uninitialized -> Loading`, then resolve from the
/// stored token. Without a token the check resolves immediately.
pub fn install_startup_check<S>(auth: RwSignal<AuthState>, session: SessionStore<S>, config: ClientConfig)
where
    S: KeyValueStore + 'static,
{
    auth.update(|a| {
        if let Err(e) = a.begin_startup_check() {
            leptos::logging::warn!("auth startup check: {e}");
        }
    });

    let Some(token) = session.token() else {
        auth.update(|a| {
            let _ = a.resolve_startup(None);
        });
        return;
    };

    leptos::task::spawn_local(async move {
        let result = crate::net::api::fetch_current_user(&config, &token)
            .await
            .map(|user| user.id);
        if let Err(e) = &result {
            leptos::logging::warn!("stored session rejected: {e}");
        }
        apply_startup_result(auth, &session, &token, result);
    });
}

/// Settle the startup check for `token`.
///
/// An identity committed while the check was in flight wins: when the
/// stored token is no longer `token`, storage is left alone, and auth is
/// only resolved if it is still waiting on this check.
pub fn apply_startup_result<S: KeyValueStore>(
    auth: RwSignal<AuthState>,
    session: &SessionStore<S>,
    token: &str,
    result: Result<String, ApiError>,
) {
    if !auth.with_untracked(|a| *a.phase() == AuthPhase::Loading) {
        leptos::logging::log!("startup check superseded by a newer identity");
        return;
    }
    if session.token().as_deref() == Some(token) {
        persist_startup_result(session, &result);
    }
    auth.update(|a| {
        if let Err(e) = a.resolve_startup(Some(result)) {
            leptos::logging::warn!("auth startup check: {e}");
        }
    });
}

/// Re-validate the stored token for the signed-in user.
///
/// Marks the refresh in flight (so route gates hold their decision), asks
/// the backend who the token belongs to, and settles the result.
pub fn refresh_session<S>(teardown: SignalTeardown, session: SessionStore<S>, config: ClientConfig)
where
    S: KeyValueStore + 'static,
{
    let mut current = None;
    teardown.auth.update(|a| match a.begin_refresh() {
        Ok(()) => current = a.user_id().map(str::to_owned),
        Err(e) => leptos::logging::warn!("session refresh: {e}"),
    });
    let Some(current) = current else {
        return;
    };
    let Some(token) = session.token() else {
        end_refresh(teardown, &session, &current, Err(ApiError::Status { status: 401, message: None }));
        return;
    };

    leptos::task::spawn_local(async move {
        let result = crate::net::api::fetch_current_user(&config, &token)
            .await
            .map(|user| user.id);
        settle_refresh(teardown, &session, &current, &token, result);
    });
}

/// Apply a refresh of `token` for `current`.
///
/// Anything other than the same user coming back ends the session: the
/// realtime link and cached results go, and the token is forgotten unless
/// the failure was transient. A result for a token or user that has since
/// been replaced is dropped.
pub fn settle_refresh<S: KeyValueStore>(
    teardown: SignalTeardown,
    session: &SessionStore<S>,
    current: &str,
    token: &str,
    result: Result<String, ApiError>,
) {
    let still_pending = teardown
        .auth
        .with_untracked(|a| a.user_id() == Some(current) && a.is_loading());
    if !still_pending || session.token().as_deref() != Some(token) {
        leptos::logging::log!("refresh for {current} superseded; ignoring result");
        return;
    }
    end_refresh(teardown, session, current, result);
}

fn end_refresh<S: KeyValueStore>(
    teardown: SignalTeardown,
    session: &SessionStore<S>,
    current: &str,
    result: Result<String, ApiError>,
) {
    let same_user = matches!(&result, Ok(id) if id == current);
    if !same_user {
        let mut teardown = teardown;
        teardown.close_realtime(CloseReason::LOGOUT);
        teardown.clear_cached_results();
        let forget_token = match &result {
            Ok(_) => true,
            Err(e) => e.is_unauthorized(),
        };
        if forget_token {
            session.clear_auth();
        }
    }

    teardown.auth.update(|a| {
        if let Err(e) = a.finish_refresh(result.as_deref().map_err(Clone::clone)) {
            leptos::logging::warn!("session refresh: {e}");
        }
    });
}
