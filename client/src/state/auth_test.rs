use super::*;

fn loading() -> AuthState {
    let mut state = AuthState::default();
    state.begin_startup_check().unwrap();
    state
}

fn signed_in(user: &str) -> AuthState {
    let mut state = loading();
    state.resolve_authenticated(user).unwrap();
    state
}

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_is_uninitialized() {
    let state = AuthState::default();
    assert_eq!(state.phase(), &AuthPhase::Uninitialized);
    assert!(!state.initialized());
    assert!(state.user_id().is_none());
    assert!(state.is_deferred());
}

#[test]
fn auth_state_default_not_loading() {
    assert!(!AuthState::default().is_loading());
}

// =============================================================
// Startup check
// =============================================================

#[test]
fn begin_startup_check_enters_loading() {
    let state = loading();
    assert!(state.is_loading());
    assert!(!state.initialized());
    assert!(state.is_deferred());
}

#[test]
fn begin_startup_check_twice_is_rejected() {
    let mut state = loading();
    assert_eq!(state.begin_startup_check(), Err(TransitionError::AlreadyStarted));
}

#[test]
fn resolve_authenticated_sets_user_and_initialized() {
    let state = signed_in("u1");
    assert_eq!(state.user_id(), Some("u1"));
    assert!(state.initialized());
    assert!(!state.is_deferred());
}

#[test]
fn resolve_unauthenticated_initializes_without_user() {
    let mut state = loading();
    state.resolve_unauthenticated().unwrap();
    assert_eq!(state.phase(), &AuthPhase::Unauthenticated);
    assert!(state.initialized());
    assert!(!state.is_deferred());
}

#[test]
fn resolve_before_start_is_rejected() {
    let mut state = AuthState::default();
    assert_eq!(state.resolve_authenticated("u1"), Err(TransitionError::NotLoading));
    assert_eq!(state.resolve_unauthenticated(), Err(TransitionError::NotLoading));
    assert!(!state.initialized());
}

#[test]
fn resolve_startup_without_token_is_unauthenticated() {
    let mut state = loading();
    state.resolve_startup(None).unwrap();
    assert_eq!(state.phase(), &AuthPhase::Unauthenticated);
}

#[test]
fn resolve_startup_failure_is_not_fatal() {
    let mut state = loading();
    state
        .resolve_startup(Some(Err(ApiError::Network("offline".to_owned()))))
        .unwrap();
    assert_eq!(state.phase(), &AuthPhase::Unauthenticated);
    assert!(state.initialized());
}

#[test]
fn resolve_startup_success_authenticates() {
    let mut state = loading();
    state.resolve_startup(Some(Ok("u7".to_owned()))).unwrap();
    assert_eq!(state.user_id(), Some("u7"));
}

// =============================================================
// Refresh
// =============================================================

#[test]
fn refresh_in_flight_counts_as_loading() {
    let mut state = signed_in("u1");
    state.begin_refresh().unwrap();
    assert!(state.is_loading());
    assert!(state.is_deferred());
    assert!(state.initialized());
}

#[test]
fn refresh_success_keeps_user() {
    let mut state = signed_in("u1");
    state.begin_refresh().unwrap();
    state.finish_refresh(Ok("u1")).unwrap();
    assert_eq!(state.user_id(), Some("u1"));
    assert!(!state.is_loading());
}

#[test]
fn refresh_failure_signs_out_but_stays_initialized() {
    let mut state = signed_in("u1");
    state.begin_refresh().unwrap();
    state
        .finish_refresh(Err(ApiError::Status { status: 401, message: None }))
        .unwrap();
    assert_eq!(state.phase(), &AuthPhase::Unauthenticated);
    assert!(state.initialized());
}

#[test]
fn refresh_for_other_user_is_rejected_and_signs_out() {
    let mut state = signed_in("u1");
    state.begin_refresh().unwrap();
    let err = state.finish_refresh(Ok("u2")).unwrap_err();
    assert_eq!(
        err,
        TransitionError::IdentityChanged { current: "u1".to_owned(), received: "u2".to_owned() }
    );
    assert!(state.user_id().is_none());
}

#[test]
fn refresh_requires_signed_in_user() {
    let mut state = loading();
    state.resolve_unauthenticated().unwrap();
    assert_eq!(state.begin_refresh(), Err(TransitionError::NotAuthenticated));
}

#[test]
fn finish_refresh_without_begin_is_rejected() {
    let mut state = signed_in("u1");
    assert_eq!(state.finish_refresh(Ok("u1")), Err(TransitionError::NoRefreshInFlight));
}

// =============================================================
// Logout and identity switch
// =============================================================

#[test]
fn logout_keeps_initialized() {
    let mut state = signed_in("u1");
    state.logout().unwrap();
    assert!(state.user_id().is_none());
    assert!(state.initialized());
}

#[test]
fn logout_when_signed_out_is_rejected() {
    let mut state = AuthState::default();
    assert_eq!(state.logout(), Err(TransitionError::NotAuthenticated));
}

#[test]
fn switch_identity_replaces_user() {
    let mut state = signed_in("u1");
    state.switch_identity("u2");
    assert_eq!(state.user_id(), Some("u2"));
    assert!(state.initialized());
}

#[test]
fn switch_identity_during_startup_initializes() {
    let mut state = loading();
    state.switch_identity("u2");
    assert_eq!(state.user_id(), Some("u2"));
    assert!(!state.is_deferred());
}
