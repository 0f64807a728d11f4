use super::*;

fn msg(id: &str, project: &str) -> ChatMessage {
    ChatMessage {
        id: id.to_owned(),
        project_id: project.to_owned(),
        sender_id: "u1".to_owned(),
        sender_name: None,
        content: format!("message {id}"),
        timestamp: 0.0,
    }
}

// =============================================================
// ChatState defaults
// =============================================================

#[test]
fn chat_state_default_empty_messages() {
    let state = ChatState::default();
    assert!(state.messages.is_empty());
    assert_eq!(state.connection, ConnectionStatus::Disconnected);
}

// =============================================================
// Appending
// =============================================================

#[test]
fn append_requires_open_channel() {
    let mut state = ChatState::default();
    assert!(!state.append(msg("m1", "p1")));
}

#[test]
fn append_adds_messages_for_current_project() {
    let mut state = ChatState::default();
    state.reset_for("p1");
    assert!(state.append(msg("m1", "p1")));
    assert!(!state.append(msg("m2", "p2")));
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn append_ignores_duplicate_ids() {
    let mut state = ChatState::default();
    state.reset_for("p1");
    assert!(state.append(msg("m1", "p1")));
    assert!(!state.append(msg("m1", "p1")));
    assert_eq!(state.messages.len(), 1);
}

// =============================================================
// Channel switching and history
// =============================================================

#[test]
fn reset_for_other_project_drops_messages() {
    let mut state = ChatState::default();
    state.reset_for("p1");
    state.append(msg("m1", "p1"));
    state.reset_for("p2");
    assert!(state.messages.is_empty());
}

#[test]
fn reset_for_same_project_keeps_messages() {
    let mut state = ChatState::default();
    state.reset_for("p1");
    state.append(msg("m1", "p1"));
    state.error = Some("boom".to_owned());
    state.reset_for("p1");
    assert_eq!(state.messages.len(), 1);
    assert!(state.error.is_none());
}

#[test]
fn load_history_keeps_earlier_live_messages() {
    let mut state = ChatState::default();
    state.reset_for("p1");
    state.append(msg("m3", "p1"));
    state.load_history(vec![msg("m1", "p1"), msg("m2", "p1"), msg("m3", "p1")]);
    let ids: Vec<_> = state.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["m1", "m2", "m3"]);
}

#[test]
fn clear_resets_everything() {
    let mut state = ChatState::default();
    state.reset_for("p1");
    state.append(msg("m1", "p1"));
    state.connection = ConnectionStatus::Connected;
    state.clear();
    assert!(state.project_id.is_none());
    assert!(state.messages.is_empty());
    assert_eq!(state.connection, ConnectionStatus::Disconnected);
}
