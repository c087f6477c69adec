//! Navigation primitive owned by the embedding shell.
//!
//! Fire-and-forget by contract: callers assume `navigate` always succeeds,
//! so implementations must not block or fail.

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
