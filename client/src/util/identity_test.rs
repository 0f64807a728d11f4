use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::{GetUntracked, WithUntracked};

use super::*;
use crate::net::message_stream::{StreamCommand, StreamKey};
use crate::net::types::Project;
use crate::util::storage::MemoryStorage;

type EventLog = Rc<RefCell<Vec<String>>>;

/// Storage that records every write into the shared event log.
#[derive(Clone)]
struct RecordingStorage {
    inner: MemoryStorage,
    log: EventLog,
}

impl KeyValueStore for RecordingStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.log.borrow_mut().push(format!("set {key}={value}"));
        self.inner.set(key, value);
    }

    fn remove(&self, key: &str) {
        self.log.borrow_mut().push(format!("remove {key}"));
        self.inner.remove(key);
    }
}

struct RecordingTeardown {
    log: EventLog,
}

impl IdentityTeardown for RecordingTeardown {
    fn close_realtime(&mut self, reason: CloseReason) {
        self.log.borrow_mut().push(format!("close {}", reason.code));
    }

    fn clear_cached_results(&mut self) {
        self.log.borrow_mut().push("clear cache".to_owned());
    }

    fn commit_auth(&mut self, user_id: Option<&str>) {
        self.log
            .borrow_mut()
            .push(format!("auth {}", user_id.unwrap_or("-")));
    }
}

fn fixture() -> (SessionStore<RecordingStorage>, RecordingTeardown, EventLog) {
    let log = EventLog::default();
    let storage = RecordingStorage { inner: MemoryStorage::new(), log: Rc::clone(&log) };
    (SessionStore::new(storage), RecordingTeardown { log: Rc::clone(&log) }, log)
}

fn bundle(token: &str, user: &str) -> TokenBundle {
    TokenBundle { token: token.to_owned(), user_id: user.to_owned() }
}

fn position(log: &EventLog, event: &str) -> usize {
    log.borrow()
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("missing event {event:?} in {:?}", log.borrow()))
}

// =============================================================
// switch_identity
// =============================================================

#[test]
fn switch_from_a_to_b_tears_down_a_before_committing_b() {
    let (session, mut teardown, log) = fixture();
    session.set_token("t0");
    session.set_user_id("u1");
    session.set_selected_project("u1", "p1");
    log.borrow_mut().clear();

    let result = switch_identity(&session, &mut teardown, &bundle("t1", "u2"));

    assert_eq!(result.previous_user_id.as_deref(), Some("u1"));
    assert!(result.changed_user());

    let close = position(&log, "close 4001");
    let clear_selection = position(&log, "remove selectedProject:u1");
    let clear_cache = position(&log, "clear cache");
    let commit_user = position(&log, "set userId=u2");
    let commit_auth = position(&log, "auth u2");
    assert!(close < clear_selection);
    assert!(clear_selection < clear_cache);
    assert!(clear_cache < commit_user);
    assert!(commit_user < commit_auth);

    assert_eq!(session.selected_project("u1"), None);
    assert_eq!(session.user_id().as_deref(), Some("u2"));
    assert_eq!(session.token().as_deref(), Some("t1"));
}

#[test]
fn switch_never_clears_incoming_users_selection() {
    let (session, mut teardown, _log) = fixture();
    session.set_user_id("u1");
    session.set_selected_project("u2", "p9");

    switch_identity(&session, &mut teardown, &bundle("t1", "u2"));

    assert_eq!(session.selected_project("u2").as_deref(), Some("p9"));
}

#[test]
fn same_user_reauth_keeps_selection_but_resets_connection_and_cache() {
    let (session, mut teardown, log) = fixture();
    session.set_user_id("u1");
    session.set_selected_project("u1", "p1");
    log.borrow_mut().clear();

    let result = switch_identity(&session, &mut teardown, &bundle("t2", "u1"));

    assert!(!result.changed_user());
    assert_eq!(session.selected_project("u1").as_deref(), Some("p1"));
    assert!(log.borrow().contains(&"close 4001".to_owned()));
    assert!(log.borrow().contains(&"clear cache".to_owned()));
}

#[test]
fn first_sign_in_has_nothing_to_close() {
    let (session, mut teardown, log) = fixture();

    let result = switch_identity(&session, &mut teardown, &bundle("t1", "u1"));

    assert_eq!(result.previous_user_id, None);
    assert!(!log.borrow().iter().any(|e| e.starts_with("close")));
    assert_eq!(session.user_id().as_deref(), Some("u1"));
}

// =============================================================
// sign_out
// =============================================================

#[test]
fn sign_out_tears_down_then_clears_session() {
    let (session, mut teardown, log) = fixture();
    session.set_token("t1");
    session.set_user_id("u1");
    session.set_selected_project("u1", "p1");
    log.borrow_mut().clear();

    assert_eq!(sign_out(&session, &mut teardown).as_deref(), Some("u1"));

    assert!(position(&log, "close 1000") < position(&log, "remove userId"));
    assert!(position(&log, "remove userId") < position(&log, "auth -"));
    assert_eq!(session.snapshot(), crate::state::session::Session::default());
}

// =============================================================
// SignalTeardown
// =============================================================

#[test]
fn signal_teardown_resets_reactive_state() {
    let auth = RwSignal::new(AuthState::default());
    let cache = RwSignal::new(QueryCache::default());
    let chat = RwSignal::new(ChatState::default());
    let realtime = RwSignal::new(RealtimeLink::default());
    let mut teardown = SignalTeardown { auth, cache, chat, realtime };

    let mut session_rx = None;
    realtime.update(|link| {
        session_rx = link.open(StreamKey { user_id: "u1".to_owned(), project_id: "p1".to_owned() });
    });
    cache.update(|c| {
        c.store_project(Project {
            id: "p1".to_owned(),
            name: "Hive".to_owned(),
            description: String::new(),
            owner_id: None,
        });
    });
    chat.update(|c| c.reset_for("p1"));

    let store = SessionStore::new(MemoryStorage::new());
    store.set_user_id("u1");
    switch_identity(&store, &mut teardown, &bundle("t2", "u2"));

    assert_eq!(auth.get_untracked().user_id(), Some("u2"));
    assert!(cache.get_untracked().is_empty());
    assert!(chat.get_untracked().project_id.is_none());
    assert!(realtime.with_untracked(|link| !link.is_open()));

    let mut session = session_rx.unwrap();
    assert_eq!(
        session.commands.try_next().unwrap(),
        Some(StreamCommand::Close(CloseReason::IDENTITY_SWITCH))
    );
}
