//! # caredesk-gateway
//!
//! HTTP layer of the CareDesk gateway, built on Axum:
//!
//! - `router` — route table and middleware stack
//! - `middleware` — route guard and request logging
//! - `resolver` — cached current-user resolution
//! - `handlers` — auth flow, dashboard pages, health
//! - `dto` — request/response bodies
//! - `state` — shared [`AppState`]

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod resolver;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
