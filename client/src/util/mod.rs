//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns and access-control
//! decisions from page and component logic so they stay testable natively.

pub mod auth;
pub mod identity;
pub mod oauth;
pub mod route_access;
pub mod route_gate;
pub mod storage;
pub mod validation;
