use super::*;
use crate::state::auth::AuthPhase;
use crate::util::storage::MemoryStorage;

fn session() -> SessionStore<MemoryStorage> {
    let session = SessionStore::new(MemoryStorage::new());
    session.set_token("t1");
    session.set_user_id("u1");
    session.set_selected_project("u1", "p1");
    session
}

#[test]
fn validated_user_overwrites_stale_id() {
    let s = session();
    persist_startup_result(&s, &Ok("u2".to_owned()));
    assert_eq!(s.user_id().as_deref(), Some("u2"));
    assert_eq!(s.token().as_deref(), Some("t1"));
}

#[test]
fn validated_same_user_keeps_selection() {
    let s = session();
    persist_startup_result(&s, &Ok("u1".to_owned()));
    assert_eq!(s.selected_project("u1").as_deref(), Some("p1"));
}

#[test]
fn rejected_token_is_forgotten() {
    let s = session();
    persist_startup_result(&s, &Err(ApiError::Status { status: 401, message: None }));
    assert!(!s.snapshot().token_present);
    assert_eq!(s.user_id(), None);
}

#[test]
fn transient_failure_keeps_token() {
    let s = session();
    persist_startup_result(&s, &Err(ApiError::Network("offline".to_owned())));
    assert!(s.snapshot().token_present);
}

#[test]
fn startup_without_token_resolves_unauthenticated() {
    let auth = RwSignal::new(AuthState::default());
    install_startup_check(auth, SessionStore::new(MemoryStorage::new()), ClientConfig::default());
    let state = auth.get_untracked();
    assert_eq!(state.phase(), &AuthPhase::Unauthenticated);
    assert!(state.initialized());
}

// =============================================================
// refresh
// =============================================================

fn signed_in_teardown(user: &str) -> SignalTeardown {
    let mut state = AuthState::default();
    state.switch_identity(user);
    SignalTeardown {
        auth: RwSignal::new(state),
        cache: RwSignal::new(crate::state::cache::QueryCache::default()),
        chat: RwSignal::new(crate::state::chat::ChatState::default()),
        realtime: RwSignal::new(crate::net::message_stream::RealtimeLink::default()),
    }
}

#[test]
fn refresh_holds_gate_while_in_flight() {
    let teardown = signed_in_teardown("u1");
    teardown.auth.update(|a| a.begin_refresh().unwrap());
    assert!(teardown.auth.get_untracked().is_deferred());
}

#[test]
fn refresh_for_same_user_keeps_session() {
    let s = session();
    let teardown = signed_in_teardown("u1");
    teardown.auth.update(|a| a.begin_refresh().unwrap());

    settle_refresh(teardown, &s, "u1", "t1", Ok("u1".to_owned()));

    let state = teardown.auth.get_untracked();
    assert_eq!(state.user_id(), Some("u1"));
    assert!(!state.is_loading());
    assert_eq!(s.token().as_deref(), Some("t1"));
}

#[test]
fn refresh_reporting_other_user_signs_out() {
    let s = session();
    let teardown = signed_in_teardown("u1");
    teardown.cache.update(|c| c.store_projects(Vec::new()));
    teardown.auth.update(|a| a.begin_refresh().unwrap());

    settle_refresh(teardown, &s, "u1", "t1", Ok("u2".to_owned()));

    assert_eq!(teardown.auth.get_untracked().phase(), &AuthPhase::Unauthenticated);
    assert!(teardown.cache.get_untracked().is_empty());
    assert_eq!(s.token(), None);
    assert_eq!(s.selected_project("u1"), None);
}

#[test]
fn refresh_network_failure_signs_out_but_keeps_token() {
    let s = session();
    let teardown = signed_in_teardown("u1");
    teardown.auth.update(|a| a.begin_refresh().unwrap());

    settle_refresh(teardown, &s, "u1", "t1", Err(ApiError::Network("offline".to_owned())));

    assert_eq!(teardown.auth.get_untracked().phase(), &AuthPhase::Unauthenticated);
    assert_eq!(s.token().as_deref(), Some("t1"));
}

// =============================================================
// identity switch while auth work is in flight
// =============================================================

fn switch_to(teardown: SignalTeardown, session: &SessionStore<MemoryStorage>, token: &str, user: &str) {
    let mut teardown = teardown;
    let bundle = crate::net::types::TokenBundle { token: token.to_owned(), user_id: user.to_owned() };
    crate::util::identity::switch_identity(session, &mut teardown, &bundle);
}

fn loading_teardown() -> SignalTeardown {
    let teardown = signed_in_teardown("u1");
    teardown.auth.set(AuthState::default());
    teardown.auth.update(|a| a.begin_startup_check().unwrap());
    teardown
}

#[test]
fn late_rejected_startup_check_keeps_switched_identity() {
    let s = SessionStore::new(MemoryStorage::new());
    s.set_token("t0");
    s.set_user_id("u1");
    let teardown = loading_teardown();

    switch_to(teardown, &s, "t1", "u2");
    apply_startup_result(teardown.auth, &s, "t0", Err(ApiError::Status { status: 401, message: None }));

    assert_eq!(s.token().as_deref(), Some("t1"));
    assert_eq!(s.user_id().as_deref(), Some("u2"));
    assert_eq!(teardown.auth.get_untracked().user_id(), Some("u2"));
}

#[test]
fn late_valid_startup_check_does_not_restore_old_user() {
    let s = SessionStore::new(MemoryStorage::new());
    s.set_token("t0");
    s.set_user_id("u1");
    let teardown = loading_teardown();

    switch_to(teardown, &s, "t1", "u2");
    apply_startup_result(teardown.auth, &s, "t0", Ok("u1".to_owned()));

    assert_eq!(s.user_id().as_deref(), Some("u2"));
    assert_eq!(s.token().as_deref(), Some("t1"));
    assert_eq!(teardown.auth.get_untracked().user_id(), Some("u2"));
}

#[test]
fn current_startup_check_still_resolves() {
    let s = session();
    let teardown = loading_teardown();

    apply_startup_result(teardown.auth, &s, "t1", Ok("u1".to_owned()));

    let state = teardown.auth.get_untracked();
    assert_eq!(state.user_id(), Some("u1"));
    assert!(state.initialized());
}

#[test]
fn late_refresh_failure_leaves_new_identity_alone() {
    let s = session();
    let teardown = signed_in_teardown("u1");
    teardown.auth.update(|a| a.begin_refresh().unwrap());

    switch_to(teardown, &s, "t2", "u2");
    let mut stream = None;
    teardown.realtime.update(|link| {
        stream = link.open(crate::net::message_stream::StreamKey {
            user_id: "u2".to_owned(),
            project_id: "p1".to_owned(),
        });
    });
    assert!(stream.is_some());
    teardown.cache.update(|c| c.store_projects(Vec::new()));

    settle_refresh(teardown, &s, "u1", "t1", Err(ApiError::Status { status: 401, message: None }));

    assert_eq!(s.token().as_deref(), Some("t2"));
    assert_eq!(s.user_id().as_deref(), Some("u2"));
    assert_eq!(teardown.auth.get_untracked().user_id(), Some("u2"));
    assert!(teardown.realtime.with_untracked(|link| link.is_open()));
    assert!(!teardown.cache.get_untracked().is_empty());
}
