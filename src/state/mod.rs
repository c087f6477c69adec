//! Shared application state modules.
//!
//! DESIGN
//! ======
//! `session` is the single writer of auth state, `guard` derives routing
//! decisions from it, and `prefs` keeps small per-user presentation flags
//! out of domain state.

pub mod guard;
pub mod prefs;
pub mod session;
