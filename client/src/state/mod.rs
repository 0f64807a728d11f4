//! Application state held in Leptos contexts and browser storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` is the in-memory identity state machine, `session` the persisted
//! identity and project selection, `cache` the per-user query results, and
//! `chat` the live project channel.

pub mod auth;
pub mod cache;
pub mod chat;
pub mod session;
