//! Per-session refresh coordination.

mod coordinator;
mod registry;

pub use coordinator::{RefreshCoordinator, RefreshOutcome};
pub use registry::{SessionHandle, SessionRegistry, SessionState, session_key};
