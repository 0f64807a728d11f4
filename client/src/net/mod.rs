//! Networking modules for REST and the realtime message stream.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `message_stream` owns the single websocket
//! connection, and `types` defines the shared wire schema.

pub mod api;
pub mod message_stream;
pub mod types;
