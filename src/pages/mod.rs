//! Page controllers for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Controllers own route-scoped orchestration (loading, error strings,
//! submit flows) and leave rendering to the embedding shell. They hold no
//! session state of their own; everything auth-shaped comes from
//! `state::session`.

pub mod dashboard;
pub mod login;
