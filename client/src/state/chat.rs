//! Project chat state fed by the realtime message stream.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use crate::net::types::ChatMessage;

/// Connection lifecycle of the chat stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Messages for the project whose channel is open.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub project_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub connection: ConnectionStatus,
    pub error: Option<String>,
}

impl ChatState {
    /// Start over for `project_id`, dropping messages from any other channel.
    pub fn reset_for(&mut self, project_id: &str) {
        if self.project_id.as_deref() != Some(project_id) {
            self.messages.clear();
        }
        self.project_id = Some(project_id.to_owned());
        self.error = None;
    }

    /// Replace history with the backend's list, keeping live messages that
    /// arrived before it did.
    pub fn load_history(&mut self, history: Vec<ChatMessage>) {
        let live = std::mem::replace(&mut self.messages, history);
        for msg in live {
            self.append(msg);
        }
    }

    /// Append a streamed message. Messages for another channel and repeats
    /// of a known id are ignored; returns whether the message was added.
    pub fn append(&mut self, msg: ChatMessage) -> bool {
        if self.project_id.as_deref() != Some(msg.project_id.as_str()) {
            return false;
        }
        if self.messages.iter().any(|m| m.id == msg.id) {
            return false;
        }
        self.messages.push(msg);
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
