//! Application core for a job-application tracker.
//!
//! ARCHITECTURE
//! ============
//! Users authenticate against an external identity provider, keep a single
//! résumé document, and track job-application records in an external document
//! store. This crate owns the session state machine, the route guard, the
//! page controllers, and the résumé form model; rendering and subscriber
//! setup belong to the embedding shell.
//!
//! Data flow: identity-provider change stream -> `state::session` publishes
//! `{identity, loading}` -> `state::guard` and page controllers react ->
//! controllers read/write documents through `net::documents`.

pub mod config;
pub mod forms;
pub mod nav;
pub mod net;
pub mod pages;
pub mod state;
