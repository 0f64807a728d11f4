//! Persisted session: auth token, active user id, per-user project selection.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store is the only state that survives a reload. The auth
//! provider is rebuilt from it on startup, the route gate reads the selected
//! project from it, and the identity-switch hook is the only code that clears
//! another user's entries.
//!
//! Storage layout:
//!
//! | key                        | value                 |
//! |----------------------------|-----------------------|
//! | `authToken`                | bearer token          |
//! | `userId`                   | active user id        |
//! | `selectedProject:{userId}` | that user's selection |

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::util::storage::{BrowserStorage, KeyValueStore};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_ID_KEY: &str = "userId";
const SELECTED_PROJECT_PREFIX: &str = "selectedProject:";

/// Storage key holding `user_id`'s selected project.
pub fn selected_project_key(user_id: &str) -> String {
    format!("{SELECTED_PROJECT_PREFIX}{user_id}")
}

/// Point-in-time view of the persisted session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub selected_project_id: Option<String>,
    pub token_present: bool,
}

/// Typed access to the persisted session over any [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct SessionStore<S = BrowserStorage> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Raw read. Empty values are reported as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.storage.get(key).filter(|v| !v.is_empty())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.storage.set(key, value);
    }

    pub fn clear(&self, key: &str) {
        self.storage.remove(key);
    }

    pub fn token(&self) -> Option<String> {
        self.get(AUTH_TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        self.set(AUTH_TOKEN_KEY, token);
    }

    pub fn user_id(&self) -> Option<String> {
        self.get(USER_ID_KEY)
    }

    pub fn set_user_id(&self, user_id: &str) {
        self.set(USER_ID_KEY, user_id);
    }

    pub fn selected_project(&self, user_id: &str) -> Option<String> {
        self.get(&selected_project_key(user_id))
    }

    pub fn set_selected_project(&self, user_id: &str, project_id: &str) {
        self.set(&selected_project_key(user_id), project_id);
    }

    pub fn clear_selected_project(&self, user_id: &str) {
        self.clear(&selected_project_key(user_id));
    }

    /// Selected project of the currently stored user, if any.
    pub fn active_selected_project(&self) -> Option<String> {
        self.user_id().and_then(|user_id| self.selected_project(&user_id))
    }

    pub fn snapshot(&self) -> Session {
        let user_id = self.user_id();
        let selected_project_id = user_id.as_deref().and_then(|id| self.selected_project(id));
        Session {
            user_id,
            selected_project_id,
            token_present: self.token().is_some(),
        }
    }

    /// Forget the stored identity: token, user id, and that user's selection.
    pub fn clear_auth(&self) {
        if let Some(user_id) = self.user_id() {
            self.clear_selected_project(&user_id);
        }
        self.clear(AUTH_TOKEN_KEY);
        self.clear(USER_ID_KEY);
    }
}
