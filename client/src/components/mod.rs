//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read and write shared state from Leptos context providers;
//! `protected_route` wraps every page that needs a signed-in user.

pub mod protected_route;
pub mod session_bar;
