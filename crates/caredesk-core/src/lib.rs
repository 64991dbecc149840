//! # caredesk-core
//!
//! Core building blocks shared by every CareDesk crate:
//!
//! - `config` — layered configuration loading (files + environment)
//! - `error` — the unified [`AppError`] type and its HTTP mapping
//! - `types` — user identity types shared across the gateway
//!
//! This crate sits at the bottom of the dependency graph and must not
//! depend on any other `caredesk-*` crate.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
