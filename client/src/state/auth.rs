//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the route gate and user-aware components to coordinate login
//! redirects and identity-dependent rendering. Provided through context as a
//! `RwSignal<AuthState>`; rebuilt from the session store on every startup.
//!
//! LIFECYCLE
//! =========
//! `Uninitialized -> Loading -> Authenticated(user) | Unauthenticated`.
//! `initialized` flips on the first resolution and never flips back, so the
//! gate can tell "not checked yet" apart from "checked, signed out".
//! Switching from one user to another only happens through
//! [`AuthState::switch_identity`], after the outgoing user's state has been
//! torn down.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::api::ApiError;

/// Where the auth check currently stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Uninitialized,
    Loading,
    Authenticated(String),
    Unauthenticated,
}

/// Rejected auth state transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("auth check already started")]
    AlreadyStarted,
    #[error("auth check is not in flight")]
    NotLoading,
    #[error("no authenticated user")]
    NotAuthenticated,
    #[error("no refresh in flight")]
    NoRefreshInFlight,
    #[error("refresh returned user {received} while {current} is signed in")]
    IdentityChanged { current: String, received: String },
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    phase: AuthPhase,
    initialized: bool,
    refreshing: bool,
}

impl AuthState {
    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    /// True once the startup check has resolved either way.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// True while the startup check or a token refresh is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Loading || self.refreshing
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.phase {
            AuthPhase::Authenticated(id) => Some(id),
            _ => None,
        }
    }

    /// Consumers must not redirect while this holds.
    pub fn is_deferred(&self) -> bool {
        !self.initialized || self.is_loading()
    }

    /// `Uninitialized -> Loading`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyStarted`] if the check already ran.
    pub fn begin_startup_check(&mut self) -> Result<(), TransitionError> {
        if self.phase != AuthPhase::Uninitialized {
            return Err(TransitionError::AlreadyStarted);
        }
        self.phase = AuthPhase::Loading;
        Ok(())
    }

    /// `Loading -> Authenticated(user_id)`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotLoading`] outside the startup check.
    pub fn resolve_authenticated(&mut self, user_id: &str) -> Result<(), TransitionError> {
        if self.phase != AuthPhase::Loading {
            return Err(TransitionError::NotLoading);
        }
        self.phase = AuthPhase::Authenticated(user_id.to_owned());
        self.initialized = true;
        Ok(())
    }

    /// `Loading -> Unauthenticated`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotLoading`] outside the startup check.
    pub fn resolve_unauthenticated(&mut self) -> Result<(), TransitionError> {
        if self.phase != AuthPhase::Loading {
            return Err(TransitionError::NotLoading);
        }
        self.phase = AuthPhase::Unauthenticated;
        self.initialized = true;
        Ok(())
    }

    /// Resolve the startup check from the token validation result.
    ///
    /// A missing token (`None`) and any validation failure both resolve to
    /// unauthenticated; auth initialization failures are never fatal.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotLoading`] outside the startup check.
    pub fn resolve_startup(&mut self, validation: Option<Result<String, ApiError>>) -> Result<(), TransitionError> {
        match validation {
            Some(Ok(user_id)) => self.resolve_authenticated(&user_id),
            Some(Err(_)) | None => self.resolve_unauthenticated(),
        }
    }

    /// Mark a token refresh as in flight for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotAuthenticated`] without a signed-in user.
    pub fn begin_refresh(&mut self) -> Result<(), TransitionError> {
        if self.user_id().is_none() {
            return Err(TransitionError::NotAuthenticated);
        }
        self.refreshing = true;
        Ok(())
    }

    /// Settle an in-flight refresh.
    ///
    /// Success for the same user keeps the session; failure, or a refresh
    /// that reports a different user, signs out.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NoRefreshInFlight`] without a pending
    /// refresh and [`TransitionError::IdentityChanged`] when the refreshed
    /// token belongs to someone else.
    pub fn finish_refresh(&mut self, result: Result<&str, ApiError>) -> Result<(), TransitionError> {
        if !self.refreshing {
            return Err(TransitionError::NoRefreshInFlight);
        }
        self.refreshing = false;
        let current = self.user_id().unwrap_or_default().to_owned();
        match result {
            Ok(received) if received == current => Ok(()),
            Ok(received) => {
                self.phase = AuthPhase::Unauthenticated;
                Err(TransitionError::IdentityChanged {
                    current,
                    received: received.to_owned(),
                })
            }
            Err(_) => {
                self.phase = AuthPhase::Unauthenticated;
                Ok(())
            }
        }
    }

    /// `Authenticated -> Unauthenticated`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotAuthenticated`] without a signed-in user.
    pub fn logout(&mut self) -> Result<(), TransitionError> {
        if self.user_id().is_none() {
            return Err(TransitionError::NotAuthenticated);
        }
        self.phase = AuthPhase::Unauthenticated;
        self.refreshing = false;
        Ok(())
    }

    /// Commit a new identity. Only the identity-switch hook calls this, after
    /// the previous identity's connection, selection, and caches are gone.
    pub fn switch_identity(&mut self, user_id: &str) {
        self.phase = AuthPhase::Authenticated(user_id.to_owned());
        self.refreshing = false;
        self.initialized = true;
    }
}
