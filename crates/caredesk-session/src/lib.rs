//! # caredesk-session
//!
//! Session primitives for the CareDesk gateway:
//!
//! - `claims` — refresh-token payload decoding (no signature check)
//! - `cookies` — session cookie names, parsing, and construction
//! - `tokens` — token pair types
//! - `refresh` — per-session refresh coordination and the registry
//!   that holds it

pub mod claims;
pub mod cookies;
pub mod refresh;
pub mod tokens;

pub use claims::{RefreshClaims, decode_unverified, session_is_live};
pub use refresh::{
    RefreshCoordinator, RefreshOutcome, SessionHandle, SessionRegistry, SessionState,
};
pub use tokens::{SessionTokens, TokenPair};
